mod budget_tests;
mod bytes_tests;
mod differential_tests;
