mod analyzer_tests;
mod fakes;
mod orchestrator_tests;
