pub mod json_phrase_loader;
