pub mod json_export;
pub mod rss_renderer;
