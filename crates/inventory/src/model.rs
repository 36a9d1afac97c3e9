//! Inventory records: watches, brands, batches and watch images.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use watchstock_core::{BatchId, BrandId, Entity, ImageId, UserId, WatchId};

/// A watch in inventory.
///
/// Relations (`brand`, `batch`, users, images) are referenced by id; loading
/// them is up to the caller (see [`crate::resource::WatchRelations`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watch {
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

    pub brand_id: Option<BrandId>,
    pub batch_id: Option<BatchId>,
    pub seller_id: Option<UserId>,
    pub agent_id: Option<UserId>,
    /// Owner (creator).
    pub user_id: Option<UserId>,
    /// Last editor.
    pub updated_by: Option<UserId>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Watch {
    /// A not-yet-persisted watch with only its identity and name set.
    pub fn new(id: WatchId, name: impl Into<String>) -> Self {
        Self {
            id,
            sku: None,
            name: name.into(),
            serial_number: None,
            reference: None,
            case_size: None,
            wrist_size: None,
            caliber: None,
            timegrapher: None,
            cost_original: None,
            cost_euro: None,
            cost_currency: None,
            cost_currency_rate: None,
            cost_currency_rate_date: None,
            cost_purchase_date: None,
            status: None,
            stage: None,
            location: None,
            platform: None,
            ai_instructions: None,
            ai_thread_id: None,
            ai_status: None,
            ai_message: None,
            notes: None,
            description: None,
            brand_id: None,
            batch_id: None,
            seller_id: None,
            agent_id: None,
            user_id: None,
            updated_by: None,
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }

    /// Watches are addressed by SKU in URLs.
    pub fn route_key(&self) -> Option<&str> {
        self.sku.as_deref()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl Entity for Watch {
    type Id = WatchId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
}

impl Brand {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: BrandId::new(),
            name: name.into(),
        }
    }
}

impl Entity for Brand {
    type Id = BrandId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Acquisition batch (watches bought together).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub id: BatchId,
    pub name: String,
}

impl Batch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: BatchId::new(),
            name: name.into(),
        }
    }
}

impl Entity for Batch {
    type Id = BatchId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Image attached to a watch. `path` is relative to the public storage disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchImage {
    pub id: ImageId,
    pub watch_id: WatchId,
    pub path: String,
    pub order_index: u32,
    pub use_for_ai: bool,
}

impl Entity for WatchImage {
    type Id = ImageId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// `{id, name}` projection of a user, as exposed on watch resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
}

/// Images ordered the way they are displayed (`order_index` ascending).
pub fn sort_images(images: &mut [WatchImage]) {
    images.sort_by_key(|image| image.order_index);
}
