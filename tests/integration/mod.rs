//! Integration tests for the slcli command-line client

mod config_loading;
mod dispatcher_flow;
mod formatting_output;
mod resource_commands;
mod rest_transport;
mod template_prefill;
mod test_utils;
