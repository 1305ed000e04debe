//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Parley Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[server]
# base_url = "http://localhost:8000/api/v1"
# connect_timeout_secs = 10    # 1-120
# request_timeout_secs = 120   # 1-600

[user]
# email = "john@example.com"

[session]
# state_file = "/path/to/state.json"   # default: <data dir>/parley/state.json
# storage_key = "sessionId"

[chat]
# failure_notice = "Sorry, I encountered an error. Please try again or start a new chat."
# failure_toast = "Failed to send message. Please try again."

[logging]
# level = "INFO"         # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
