// Integration tests for depscope

mod fixtures {
    pub mod generate_large_repository;
}

mod integration {
    mod cli_test;
    mod config_test;
    mod end_to_end_test;
    mod output_test;
    mod performance_test;
}
