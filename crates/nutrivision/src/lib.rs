//! NutriVision — vision analysis client that turns food photos into structured nutrition data.

pub mod client;
pub mod image;
pub mod reply;
pub mod types;

pub use client::{NutritionAnalyzer, VisionClient, VisionConfig, NUTRITION_PROMPT};
pub use image::{data_url_from_file, describe_image_ref};
pub use reply::{parse_nutrition_reply, strip_code_fences};
pub use types::*;
