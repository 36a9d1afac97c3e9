//! SKU generation.

use crate::error::InventoryResult;

/// Entity type a SKU is unique within.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SkuScope {
    Watch,
}

/// Derives a SKU from a brand name and an item name.
///
/// `taken` reports whether a candidate is already used within `scope`; the
/// generator must keep producing candidates until one is free.
pub trait SkuGenerator: Send + Sync {
    fn generate(
        &self,
        scope: SkuScope,
        brand: &str,
        name: &str,
        taken: &dyn Fn(&str) -> InventoryResult<bool>,
    ) -> InventoryResult<String>;
}

/// `BRA-NAME-0001`: brand prefix, name prefix, first free sequence number.
#[derive(Debug, Clone)]
pub struct PrefixSkuGenerator {
    brand_len: usize,
    name_len: usize,
}

impl PrefixSkuGenerator {
    pub fn new() -> Self {
        Self {
            brand_len: 3,
            name_len: 4,
        }
    }

    /// Candidate without the sequence suffix, e.g. `ROL-SUBM`.
    pub fn stem(&self, brand: &str, name: &str) -> String {
        let brand = segment(brand, self.brand_len).unwrap_or_else(|| "XXX".to_string());
        let name = segment(name, self.name_len).unwrap_or_else(|| "ITEM".to_string());
        format!("{brand}-{name}")
    }
}

impl Default for PrefixSkuGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SkuGenerator for PrefixSkuGenerator {
    fn generate(
        &self,
        _scope: SkuScope,
        brand: &str,
        name: &str,
        taken: &dyn Fn(&str) -> InventoryResult<bool>,
    ) -> InventoryResult<String> {
        let stem = self.stem(brand, name);

        let mut sequence: u32 = 1;
        loop {
            let candidate = format!("{stem}-{sequence:04}");
            if !taken(&candidate)? {
                return Ok(candidate);
            }
            sequence += 1;
        }
    }
}

fn segment(input: &str, len: usize) -> Option<String> {
    let segment: String = input
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(len)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    (!segment.is_empty()).then_some(segment)
}
