pub mod captions;
pub mod voiceover;
