pub mod tests_model_eval;
pub mod tests_values;
