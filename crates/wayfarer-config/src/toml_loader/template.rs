//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# Wayfarer Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[view]
# toolbar_height = 72            # 0-400, pixels above tab content
# title_poll_interval_ms = 200   # 16-5000
# preload_script = "build/view-preload.bundle.js"
# home_url = "wayfarer://newtab"
# user_agent = ""

[security]
# "reject" refuses pages with certificate errors, "accept" proceeds anyway.
certificate_policy = "reject"

[session]
# extensions_dir = "/path/to/extensions"
# builtin_extension = "extensions/wayfarer-darkreader"
# downloads_dir = "/path/to/downloads"
# storage_categories = ["appcache", "cookies", "filesystem", "indexdb", "localstorage",
#                       "shadercache", "websql", "serviceworkers", "cachestorage"]
# blocked_hosts = []

[dialogs]
# base_url = "wayfarer://dialogs"

[dialogs.menu]
# width = 330
# height = 470
# hide_delay_ms = 200

[logging]
# level = "info"                 # trace, debug, info, warn, error
"##
}
