//! Element id conventions shared by the page templates and the steps
//!
//! Form fields are addressed by a prefixed, snake-cased version of their
//! label ("Available" -> `product_available`). Buttons drop the prefix and
//! use a `-btn` suffix instead ("Search" -> `search-btn`).

/// Prefix of every form field id. The HTML templates must use it too.
pub const ID_PREFIX: &str = "product_";

/// Container the search results are rendered into.
pub const SEARCH_RESULTS_ID: &str = "search_results";

/// Element that carries the flash message after every action.
pub const FLASH_MESSAGE_ID: &str = "flash_message";

const BUTTON_SUFFIX: &str = "-btn";

/// Id of the form field labelled `name`.
pub fn element_id(prefix: &str, name: &str) -> String {
    format!("{}{}", prefix, name.to_lowercase().replace(' ', "_"))
}

/// Id of the button labelled `name`.
///
/// Only the case is folded; whitespace is kept as written.
pub fn button_id(name: &str) -> String {
    format!("{}{}", name.to_lowercase(), BUTTON_SUFFIX)
}
