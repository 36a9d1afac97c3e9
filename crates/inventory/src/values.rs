//! Write-side inputs: the lookup key and the value bag of an upsert.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use watchstock_core::{BatchId, BrandId, ImageId, UserId, WatchId};

use crate::model::Watch;

/// Unique-key filter identifying the watch to update (or create).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchKey {
    Id(WatchId),
    Sku(String),
}

impl WatchKey {
    pub fn matches(&self, watch: &Watch) -> bool {
        match self {
            WatchKey::Id(id) => watch.id == *id,
            WatchKey::Sku(sku) => watch.sku.as_deref() == Some(sku.as_str()),
        }
    }
}

/// Uploaded file content.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.map(str::to_string),
            bytes,
        }
    }

    /// Lowercased extension, if the filename has one.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.filename.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

impl core::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// One entry of the desired image list, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInput {
    /// Existing image to keep.
    pub id: Option<ImageId>,
    /// New (or replacement) file.
    pub file: Option<UploadedFile>,
    pub use_for_ai: bool,
}

/// Value bag of an upsert. `None` leaves the stored value untouched.
///
/// `brand` and `batch` carry names; the upsert workflow resolves them into
/// `brand_id` / `batch_id` before anything is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchValues {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub serial_number: Option<String>,
    pub reference: Option<String>,
    pub case_size: Option<String>,
    pub wrist_size: Option<String>,
    pub caliber: Option<String>,
    pub timegrapher: Option<String>,
    pub cost_original: Option<Decimal>,
    pub cost_euro: Option<Decimal>,
    pub cost_currency: Option<String>,
    pub cost_currency_rate: Option<Decimal>,
    pub cost_currency_rate_date: Option<NaiveDate>,
    pub cost_purchase_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub stage: Option<String>,
    pub location: Option<String>,
    pub platform: Option<String>,
    pub ai_instructions: Option<String>,
    pub ai_thread_id: Option<String>,
    pub ai_status: Option<String>,
    pub ai_message: Option<String>,
    pub notes: Option<String>,
    pub description: Option<String>,
    pub seller_id: Option<UserId>,
    pub agent_id: Option<UserId>,
    pub user_id: Option<UserId>,

    pub brand: Option<String>,
    pub batch: Option<String>,
    pub brand_id: Option<BrandId>,
    pub batch_id: Option<BatchId>,

    /// `Some(vec![])` removes every image; `None` leaves images alone.
    pub images: Option<Vec<ImageInput>>,
}

macro_rules! overwrite {
    ($watch:ident, $values:ident; $($field:ident),+ $(,)?) => {
        $(
            if let Some(v) = $values.$field {
                $watch.$field = Some(v);
            }
        )+
    };
}

impl WatchValues {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_batch(mut self, batch: impl Into<String>) -> Self {
        self.batch = Some(batch.into());
        self
    }

    pub fn with_images(mut self, images: Vec<ImageInput>) -> Self {
        self.images = Some(images);
        self
    }

    /// Copy every provided attribute onto `watch`. Relation names and images
    /// are not attributes and are ignored here.
    pub fn apply_to(&self, watch: &mut Watch) {
        let values = self.clone();

        if let Some(name) = values.name {
            watch.name = name;
        }

        overwrite!(watch, values;
            sku,
            serial_number,
            reference,
            case_size,
            wrist_size,
            caliber,
            timegrapher,
            cost_currency,
            cost_currency_rate,
            cost_currency_rate_date,
            cost_purchase_date,
            status,
            stage,
            location,
            platform,
            ai_instructions,
            ai_thread_id,
            ai_status,
            ai_message,
            notes,
            description,
            seller_id,
            agent_id,
            user_id,
            brand_id,
            batch_id,
        );

        // Monetary amounts are stored with two decimals.
        if let Some(v) = values.cost_original {
            watch.cost_original = Some(v.round_dp(2));
        }
        if let Some(v) = values.cost_euro {
            watch.cost_euro = Some(v.round_dp(2));
        }

        watch.updated_at = Some(Utc::now());
    }

    /// Build a new watch from the lookup key plus these values.
    pub fn build(&self, key: &WatchKey) -> Watch {
        let id = match key {
            WatchKey::Id(id) => *id,
            WatchKey::Sku(_) => WatchId::new(),
        };

        let mut watch = Watch::new(id, String::new());
        if let WatchKey::Sku(sku) = key {
            watch.sku = Some(sku.clone());
        }

        self.apply_to(&mut watch);
        watch.created_at = watch.updated_at;
        watch
    }
}
