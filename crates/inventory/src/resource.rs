//! JSON representation of a watch for API consumers.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use watchstock_core::{ImageId, WatchId};

use crate::model::{Batch, Brand, UserSummary, Watch, WatchImage, sort_images};
use crate::storage::BlobStorage;

/// Relations loaded alongside a watch.
///
/// Outer `None` means "not loaded" and the key is omitted from the JSON.
/// `Some(None)` means loaded but empty and renders as `null`.
#[derive(Debug, Clone, Default)]
pub struct WatchRelations {
    pub brand: Option<Option<Brand>>,
    pub batch: Option<Option<Batch>>,
    pub images: Option<Vec<WatchImage>>,
    pub user: Option<Option<UserSummary>>,
    pub updated_by: Option<Option<UserSummary>>,
    pub seller: Option<Option<UserSummary>>,
    pub agent: Option<Option<UserSummary>>,
    pub status: Option<Option<String>>,
    pub location: Option<Option<String>>,
}

impl WatchRelations {
    /// Mark `status` and `location` as loaded, taking them from `watch`.
    pub fn with_columns(mut self, watch: &Watch) -> Self {
        self.status = Some(watch.status.clone());
        self.location = Some(watch.location.clone());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageResource {
    pub id: ImageId,
    pub url: String,
    pub order_index: u32,
    pub use_for_ai: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WatchResource {
    pub id: WatchId,
    pub sku: Option<String>,
    pub name: String,
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
    pub notes: Option<String>,
    pub description: Option<String>,
    pub ai_instructions: Option<String>,
    pub ai_thread_id: Option<String>,
    pub ai_status: Option<String>,
    pub ai_message: Option<String>,
    pub platform: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,

    pub route_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageResource>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_image_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Option<UserSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<Option<UserSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller: Option<Option<UserSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<Option<UserSummary>>,
}

impl WatchResource {
    /// `storage` resolves image paths into public URLs.
    pub fn new(watch: &Watch, relations: WatchRelations, storage: &dyn BlobStorage) -> Self {
        let images = relations.images.map(|mut images| {
            sort_images(&mut images);
            images
        });

        let image_resources = images.as_ref().map(|images| {
            images
                .iter()
                .map(|image| ImageResource {
                    id: image.id,
                    url: storage.url(&image.path),
                    order_index: image.order_index,
                    use_for_ai: image.use_for_ai,
                })
                .collect::<Vec<_>>()
        });
        let image_urls = image_resources
            .as_ref()
            .map(|images| images.iter().map(|i| i.url.clone()).collect());
        let ai_image_urls = image_resources.as_ref().map(|images| {
            images
                .iter()
                .filter(|i| i.use_for_ai)
                .map(|i| i.url.clone())
                .collect()
        });

        Self {
            id: watch.id,
            sku: watch.sku.clone(),
            name: watch.name.clone(),
            serial_number: watch.serial_number.clone(),
            reference: watch.reference.clone(),
            case_size: watch.case_size.clone(),
            wrist_size: watch.wrist_size.clone(),
            caliber: watch.caliber.clone(),
            timegrapher: watch.timegrapher.clone(),
            cost_original: watch.cost_original,
            cost_euro: watch.cost_euro,
            cost_currency: watch.cost_currency.clone(),
            cost_currency_rate: watch.cost_currency_rate,
            cost_currency_rate_date: watch.cost_currency_rate_date,
            cost_purchase_date: watch.cost_purchase_date,
            notes: watch.notes.clone(),
            description: watch.description.clone(),
            ai_instructions: watch.ai_instructions.clone(),
            ai_thread_id: watch.ai_thread_id.clone(),
            ai_status: watch.ai_status.clone(),
            ai_message: watch.ai_message.clone(),
            platform: watch.platform.clone(),
            created_at: watch.created_at,
            updated_at: watch.updated_at,
            route_key: watch.route_key().map(str::to_string),
            brand: relations.brand.map(|b| b.map(|b| b.name)),
            batch: relations.batch.map(|b| b.map(|b| b.name)),
            status: relations.status,
            location: relations.location,
            images: image_resources,
            image_urls,
            ai_image_urls,
            user: relations.user,
            updated_by: relations.updated_by,
            seller: relations.seller,
            agent: relations.agent,
        }
    }
}
