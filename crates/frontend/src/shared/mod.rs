pub mod api_utils;
pub mod components;
pub mod date_utils;
pub mod form_utils;
pub mod icons;
pub mod page_frame;
pub mod page_standard;
pub mod toast;
