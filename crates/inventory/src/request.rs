//! Validation of incoming "store watch" payloads.

use core::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use watchstock_core::ImageId;

use crate::error::{InventoryError, InventoryResult, ValidationErrors};
use crate::user::CurrentUser;
use crate::values::{ImageInput, UploadedFile, WatchValues};

const MAX_STRING: usize = 255;
const MAX_IMAGES: usize = 100;
const MAX_IMAGE_KIB: usize = 5120;
const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "bmp", "svg", "webp"];

/// One entry of the `images` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageField {
    #[serde(default)]
    pub id: Option<ImageId>,
    #[serde(default)]
    pub file: Option<UploadedFile>,
    #[serde(default, rename = "useForAI")]
    pub use_for_ai: Option<bool>,
}

/// Payload for creating a watch.
///
/// Numeric fields accept JSON numbers or numeric strings, as form posts do.
/// Empty strings count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreWatchRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub sku: Option<String>,
    pub status: Option<String>,
    pub serial_number: Option<String>,
    pub reference: Option<String>,
    pub case_size: Option<String>,
    pub wrist_size: Option<String>,
    pub caliber: Option<String>,
    pub timegrapher: Option<String>,
    pub cost_original: Option<Value>,
    pub cost_euro: Option<Value>,
    pub location: Option<String>,
    pub batch: Option<String>,
    pub description: Option<String>,
    pub cost_currency: Option<String>,
    pub cost_currency_rate: Option<Value>,
    pub cost_currency_rate_date: Option<String>,
    pub notes: Option<String>,
    pub ai_instructions: Option<String>,
    pub ai_thread_id: Option<String>,
    pub images: Option<Vec<ImageField>>,
    pub images_empty: Option<String>,
}

impl StoreWatchRequest {
    /// Authorize and validate, producing the upsert value bag.
    ///
    /// `sku_taken` answers the uniqueness rule for an explicit SKU.
    pub fn validate(
        &self,
        user: &dyn CurrentUser,
        sku_taken: &dyn Fn(&str) -> InventoryResult<bool>,
    ) -> InventoryResult<WatchValues> {
        if !user.is_authenticated() {
            return Err(InventoryError::Unauthorized);
        }

        let mut errors = ValidationErrors::new();

        let name = required(&mut errors, "name", &self.name, "The watch name is required.");
        let brand = required(&mut errors, "brand", &self.brand, "The brand name is required.");

        let sku = present(&self.sku);
        if let Some(sku) = sku {
            max_chars(&mut errors, "sku", sku, MAX_STRING);
            if sku_taken(sku)? {
                errors.add("sku", "This SKU is already taken.");
            }
        }

        for (field, value) in [
            ("status", &self.status),
            ("serial_number", &self.serial_number),
            ("reference", &self.reference),
            ("case_size", &self.case_size),
            ("wrist_size", &self.wrist_size),
            ("caliber", &self.caliber),
            ("timegrapher", &self.timegrapher),
            ("location", &self.location),
            ("batch", &self.batch),
        ] {
            if let Some(value) = present(value) {
                max_chars(&mut errors, field, value, MAX_STRING);
            }
        }

        if let Some(currency) = present(&self.cost_currency) {
            max_chars(&mut errors, "cost_currency", currency, 3);
        }

        let cost_original = numeric(&mut errors, "cost_original", &self.cost_original);
        let cost_euro = numeric(&mut errors, "cost_euro", &self.cost_euro);
        let cost_currency_rate =
            numeric(&mut errors, "cost_currency_rate", &self.cost_currency_rate);

        let cost_currency_rate_date = present(&self.cost_currency_rate_date).and_then(|raw| {
            let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
            if parsed.is_none() {
                errors.add(
                    "cost_currency_rate_date",
                    "The cost currency rate date field must be a valid date.",
                );
            }
            parsed
        });

        if let Some(flag) = present(&self.images_empty) {
            if flag != "true" && flag != "false" {
                errors.add("images_empty", "The selected images empty is invalid.");
            }
        }

        if let Some(images) = &self.images {
            validate_images(&mut errors, images);
        }

        errors.into_result()?;

        Ok(WatchValues {
            name: name.map(str::to_string),
            brand: brand.map(str::to_string),
            sku: sku.map(str::to_string),
            status: owned(&self.status),
            serial_number: owned(&self.serial_number),
            reference: owned(&self.reference),
            case_size: owned(&self.case_size),
            wrist_size: owned(&self.wrist_size),
            caliber: owned(&self.caliber),
            timegrapher: owned(&self.timegrapher),
            cost_original,
            cost_euro,
            cost_currency: owned(&self.cost_currency),
            cost_currency_rate,
            cost_currency_rate_date,
            location: owned(&self.location),
            batch: owned(&self.batch),
            description: owned(&self.description),
            notes: owned(&self.notes),
            ai_instructions: owned(&self.ai_instructions),
            ai_thread_id: owned(&self.ai_thread_id),
            images: self.image_inputs(),
            ..WatchValues::default()
        })
    }

    fn image_inputs(&self) -> Option<Vec<ImageInput>> {
        match &self.images {
            Some(images) => Some(
                images
                    .iter()
                    .map(|image| ImageInput {
                        id: image.id,
                        file: image.file.clone(),
                        use_for_ai: image.use_for_ai.unwrap_or(false),
                    })
                    .collect(),
            ),
            None if present(&self.images_empty) == Some("true") => Some(Vec::new()),
            None => None,
        }
    }
}

fn validate_images(errors: &mut ValidationErrors, images: &[ImageField]) {
    if images.len() > MAX_IMAGES {
        errors.add("images", "You cannot upload more than 100 images.");
    }

    for (index, image) in images.iter().enumerate() {
        let Some(file) = &image.file else { continue };
        let field = format!("images.{index}.file");

        if !is_image(file) {
            errors.add(field.clone(), "Each file must be an image.");
        }
        if file.bytes.len() > MAX_IMAGE_KIB * 1024 {
            errors.add(field, "Each image may not be larger than 5MB.");
        }
    }
}

fn is_image(file: &UploadedFile) -> bool {
    if let Some(content_type) = &file.content_type {
        return content_type.starts_with("image/");
    }
    file.extension()
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn owned(value: &Option<String>) -> Option<String> {
    present(value).map(str::to_string)
}

fn required<'a>(
    errors: &mut ValidationErrors,
    field: &str,
    value: &'a Option<String>,
    message: &str,
) -> Option<&'a str> {
    match present(value) {
        Some(v) => {
            max_chars(errors, field, v, MAX_STRING);
            Some(v)
        }
        None => {
            errors.add(field, message);
            None
        }
    }
}

fn max_chars(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(
            field,
            format!(
                "The {} field must not be greater than {max} characters.",
                field.replace('_', " ")
            ),
        );
    }
}

fn numeric(errors: &mut ValidationErrors, field: &str, value: &Option<Value>) -> Option<Decimal> {
    let parsed = match value {
        None | Some(Value::Null) => return None,
        Some(Value::String(s)) if s.trim().is_empty() => return None,
        Some(Value::String(s)) => Decimal::from_str(s.trim())
            .or_else(|_| Decimal::from_scientific(s.trim()))
            .ok(),
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        Some(_) => None,
    };

    if parsed.is_none() {
        errors.add(
            field,
            format!("The {} field must be a number.", field.replace('_', " ")),
        );
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use watchstock_core::UserId;

    struct Authenticated;

    impl CurrentUser for Authenticated {
        fn id(&self) -> Option<UserId> {
            Some(UserId::from_uuid(Default::default()))
        }
    }

    struct Guest;

    impl CurrentUser for Guest {
        fn id(&self) -> Option<UserId> {
            None
        }
    }

    fn free(_: &str) -> InventoryResult<bool> {
        Ok(false)
    }

    fn request(body: Value) -> StoreWatchRequest {
        serde_json::from_value(body).unwrap()
    }

    fn errors_of(result: InventoryResult<WatchValues>) -> ValidationErrors {
        match result {
            Err(InventoryError::Validation(errors)) => errors,
            other => panic!("expected validation errors, got {other:?}"),
        }
    }

    #[test]
    fn guests_are_rejected() {
        let result =
            request(json!({ "name": "Daytona", "brand": "Rolex" })).validate(&Guest, &free);
        assert!(matches!(result, Err(InventoryError::Unauthorized)));
    }

    #[test]
    fn valid_payload_becomes_values() {
        let values = request(json!({
            "name": "Daytona",
            "brand": "Rolex",
            "batch": "2024-Q1",
            "cost_original": "12500.50",
            "cost_euro": 11800,
            "cost_currency": "USD",
            "cost_currency_rate_date": "2024-03-01",
            "notes": "",
        }))
        .validate(&Authenticated, &free)
        .unwrap();

        assert_eq!(values.name.as_deref(), Some("Daytona"));
        assert_eq!(values.brand.as_deref(), Some("Rolex"));
        assert_eq!(values.batch.as_deref(), Some("2024-Q1"));
        assert_eq!(values.cost_original, Some(Decimal::from_str("12500.50").unwrap()));
        assert_eq!(values.cost_euro, Some(Decimal::from(11800)));
        assert_eq!(
            values.cost_currency_rate_date,
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(values.notes, None);
        assert_eq!(values.images, None);
    }

    #[test]
    fn missing_name_and_brand_use_custom_messages() {
        let errors = errors_of(request(json!({ "name": "  " })).validate(&Authenticated, &free));

        assert_eq!(errors.get("name"), ["The watch name is required."]);
        assert_eq!(errors.get("brand"), ["The brand name is required."]);
    }

    #[test]
    fn taken_sku_is_rejected() {
        let taken = |sku: &str| -> InventoryResult<bool> { Ok(sku == "ROL-DAYT-0001") };
        let errors = errors_of(
            request(json!({ "name": "Daytona", "brand": "Rolex", "sku": "ROL-DAYT-0001" }))
                .validate(&Authenticated, &taken),
        );

        assert_eq!(errors.get("sku"), ["This SKU is already taken."]);
    }

    #[test]
    fn length_numeric_and_date_rules() {
        let errors = errors_of(
            request(json!({
                "name": "x".repeat(256),
                "brand": "Rolex",
                "cost_currency": "EURO",
                "cost_euro": "abc",
                "cost_currency_rate": true,
                "cost_currency_rate_date": "01/03/2024",
                "images_empty": "maybe",
            }))
            .validate(&Authenticated, &free),
        );

        assert_eq!(errors.get("name"), ["The name field must not be greater than 255 characters."]);
        assert_eq!(
            errors.get("cost_currency"),
            ["The cost currency field must not be greater than 3 characters."]
        );
        assert_eq!(errors.get("cost_euro"), ["The cost euro field must be a number."]);
        assert_eq!(
            errors.get("cost_currency_rate"),
            ["The cost currency rate field must be a number."]
        );
        assert_eq!(
            errors.get("cost_currency_rate_date"),
            ["The cost currency rate date field must be a valid date."]
        );
        assert_eq!(errors.get("images_empty"), ["The selected images empty is invalid."]);
        assert!(errors.get("brand").is_empty());
    }

    #[test]
    fn image_rules() {
        let mut images: Vec<Value> = vec![
            json!({
                "file": { "filename": "dial.png", "content_type": "image/png", "bytes": [1, 2, 3] }
            }),
            json!({
                "file": { "filename": "notes.pdf", "content_type": "application/pdf", "bytes": [] }
            }),
        ];
        images.extend((0..99).map(|_| json!({ "useForAI": true })));

        let errors = errors_of(
            request(json!({ "name": "Daytona", "brand": "Rolex", "images": images }))
                .validate(&Authenticated, &free),
        );

        assert_eq!(errors.get("images"), ["You cannot upload more than 100 images."]);
        assert_eq!(errors.get("images.1.file"), ["Each file must be an image."]);
        assert!(errors.get("images.0.file").is_empty());
    }

    #[test]
    fn oversized_image_is_rejected() {
        let big = UploadedFile::new("big.jpg", None, vec![0; MAX_IMAGE_KIB * 1024 + 1]);
        let req = StoreWatchRequest {
            name: Some("Daytona".into()),
            brand: Some("Rolex".into()),
            images: Some(vec![ImageField {
                file: Some(big),
                ..ImageField::default()
            }]),
            ..StoreWatchRequest::default()
        };

        let errors = errors_of(req.validate(&Authenticated, &free));
        assert_eq!(errors.get("images.0.file"), ["Each image may not be larger than 5MB."]);
    }

    #[test]
    fn untyped_files_are_judged_by_extension() {
        let file = |name: &str| ImageField {
            file: Some(UploadedFile::new(name, None, vec![1])),
            ..ImageField::default()
        };
        let req = StoreWatchRequest {
            name: Some("Daytona".into()),
            brand: Some("Rolex".into()),
            images: Some(vec![file("dial.WEBP"), file("dial.avif"), file("dial")]),
            ..StoreWatchRequest::default()
        };

        let errors = errors_of(req.validate(&Authenticated, &free));
        assert!(errors.get("images.0.file").is_empty());
        assert_eq!(errors.get("images.1.file"), ["Each file must be an image."]);
        assert_eq!(errors.get("images.2.file"), ["Each file must be an image."]);
    }

    #[test]
    fn images_empty_flag_clears_images() {
        let values = request(json!({ "name": "Daytona", "brand": "Rolex", "images_empty": "true" }))
            .validate(&Authenticated, &free)
            .unwrap();
        assert_eq!(values.images, Some(vec![]));
    }

    #[test]
    fn image_entries_keep_order_and_ai_flag() {
        let id = ImageId::new();
        let values = request(json!({
            "name": "Daytona",
            "brand": "Rolex",
            "images": [
                { "id": id, "useForAI": true },
                { "file": { "filename": "case.jpg", "content_type": null, "bytes": [9] } }
            ]
        }))
        .validate(&Authenticated, &free)
        .unwrap();

        let images = values.images.unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].id, Some(id));
        assert!(images[0].use_for_ai);
        assert!(!images[1].use_for_ai);
        assert_eq!(images[1].file.as_ref().map(|f| f.filename.as_str()), Some("case.jpg"));
    }
}
