use std::path::PathBuf;

pub fn default_base_url() -> String {
    "http://localhost:5173".to_string()
}

pub fn default_product_id() -> u64 {
    123
}

pub fn default_token_key() -> String {
    "token".to_string()
}

pub fn default_auth_token() -> String {
    "mock_token".to_string()
}

pub fn default_out_dir() -> PathBuf {
    PathBuf::from("verification")
}

pub fn default_tab_text() -> String {
    "Pricing & Values".to_string()
}

pub fn default_section_text() -> String {
    "Miscellaneous Costs".to_string()
}

pub fn default_expected_note() -> String {
    "Handling".to_string()
}

pub fn default_tab_timeout_ms() -> u64 {
    15_000
}

pub fn default_expect_timeout_ms() -> u64 {
    5_000
}

pub fn default_headless() -> bool {
    true
}

pub fn default_window_width() -> u32 {
    1920
}

pub fn default_window_height() -> u32 {
    1080
}
