mod accessor_tests;
mod buffer_tests;
