//! Per-call conversion context
//!
//! Everything a converter needs besides the document itself travels in a
//! [`ConversionContext`]: the asset store, the document id and importing user, and
//! the tunable [`ConvertOptions`]. Nothing is kept between calls.

use crate::assets::AssetStore;
use crate::common::table::TableGeometry;

/// Display width used when an exported image has no native size.
pub const DEFAULT_IMAGE_WIDTH_INCHES: f32 = 5.0;
/// Shading used for callouts that do not carry their own color.
pub const DEFAULT_CALLOUT_COLOR: &str = "#F4F4F4";

/// Tunables for the converters.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    pub table: TableGeometry,
    pub image_width_inches: f32,
    pub callout_color: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            table: TableGeometry::default(),
            image_width_inches: DEFAULT_IMAGE_WIDTH_INCHES,
            callout_color: DEFAULT_CALLOUT_COLOR.to_string(),
        }
    }
}

/// Inputs of one conversion call.
#[derive(Clone)]
pub struct ConversionContext<'a> {
    pub assets: &'a dyn AssetStore,
    pub document_id: String,
    pub user: String,
    pub options: ConvertOptions,
}

impl<'a> ConversionContext<'a> {
    pub fn new(assets: &'a dyn AssetStore) -> Self {
        ConversionContext {
            assets,
            document_id: String::new(),
            user: String::new(),
            options: ConvertOptions::default(),
        }
    }

    pub fn with_document_id(mut self, document_id: impl Into<String>) -> Self {
        self.document_id = document_id.into();
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }
}
