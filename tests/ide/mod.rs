pub mod tests_host;
