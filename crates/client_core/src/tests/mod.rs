mod collector_tests;
mod submission_tests;
