mod config_bootstrap;
mod login_workflow;
mod phone_lookup;
