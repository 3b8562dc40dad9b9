pub mod run_script;
