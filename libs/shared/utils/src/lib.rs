pub mod llm_json;
pub mod test_utils;
pub mod text;
