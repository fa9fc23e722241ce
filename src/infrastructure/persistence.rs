use crate::domain::{CartLineItem, CartState, DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CartSnapshot {
    version: u32,
    items: Vec<CartLineItem>,
}

pub fn encode_snapshot(cart: &CartState) -> DomainResult<String> {
    let snapshot = CartSnapshot {
        version: SNAPSHOT_VERSION,
        items: cart.items.clone(),
    };
    serde_json::to_string_pretty(&snapshot)
        .map_err(|e| DomainError::PersistenceUnavailable(format!("Serialization failed: {}", e)))
}

/// Parses a stored snapshot, rejecting anything that breaks the cart's
/// invariants: unknown versions, zero quantities, duplicate variants,
/// malformed prices and totals too large to compute. Bytes that are not
/// UTF-8 count as a corrupt snapshot too.
pub fn decode_snapshot(bytes: impl AsRef<[u8]>) -> DomainResult<CartState> {
    let snapshot: CartSnapshot = serde_json::from_slice(bytes.as_ref())
        .map_err(|e| DomainError::InvalidInput(format!("Invalid cart snapshot - {}", e)))?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(DomainError::InvalidInput(format!(
            "Unsupported cart snapshot version {}",
            snapshot.version
        )));
    }

    let mut seen = HashSet::new();
    for item in &snapshot.items {
        if item.quantity == 0 {
            return Err(DomainError::InvalidInput(format!(
                "Cart line '{}' has zero quantity",
                item.variant_id
            )));
        }
        if !seen.insert(item.variant_id.as_str()) {
            return Err(DomainError::InvalidInput(format!(
                "Cart line '{}' appears twice",
                item.variant_id
            )));
        }
        item.unit_price.validate()?;
    }

    let cart = CartState {
        items: snapshot.items,
        is_loading: false,
    };
    cart.check_totals()?;
    Ok(cart)
}

/// Durable slot holding the cart between sessions.
pub trait CartRepository {
    /// Reads the stored cart. `Ok(None)` means nothing has been stored yet.
    fn load(&self) -> DomainResult<Option<CartState>>;

    fn save(&self, cart: &CartState) -> DomainResult<()>;

    fn describe(&self) -> String;
}

pub struct FileCartRepository {
    path: PathBuf,
}

impl FileCartRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "cart.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CartRepository for FileCartRepository {
    fn load(&self) -> DomainResult<Option<CartState>> {
        match fs::read(&self.path) {
            Ok(content) => decode_snapshot(&content).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DomainError::PersistenceUnavailable(e.to_string())),
        }
    }

    fn save(&self, cart: &CartState) -> DomainResult<()> {
        let json = encode_snapshot(cart)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| DomainError::PersistenceUnavailable(e.to_string()))?;
        }
        let temp = self.temp_path();
        fs::write(&temp, &json).map_err(|e| DomainError::PersistenceUnavailable(e.to_string()))?;
        fs::rename(&temp, &self.path).map_err(|e| DomainError::PersistenceUnavailable(e.to_string()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Keeps the serialized snapshot in memory. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartRepository {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryCartRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(json: impl Into<String>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(json.into()))),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl CartRepository for MemoryCartRepository {
    fn load(&self) -> DomainResult<Option<CartState>> {
        match self.slot.borrow().as_deref() {
            Some(json) => decode_snapshot(json).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, cart: &CartState) -> DomainResult<()> {
        let json = encode_snapshot(cart)?;
        *self.slot.borrow_mut() = Some(json);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::tests::line;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn sample_cart() -> CartState {
        let mut cart = CartState::new();
        cart.add(line("v2", dec!(12.50), "USD", 2)).unwrap();
        cart.add(line("v1", dec!(4.00), "USD", 1)).unwrap();
        cart.add(line("v3", dec!(30), "EUR", 7)).unwrap();
        cart
    }

    #[test]
    fn test_snapshot_round_trip() {
        let cart = sample_cart();
        let json = encode_snapshot(&cart).unwrap();
        let restored = decode_snapshot(&json).unwrap();

        assert_eq!(restored, cart);
        let order: Vec<&str> = restored.items.iter().map(|i| i.variant_id.as_str()).collect();
        assert_eq!(order, vec!["v2", "v1", "v3"]);
        assert_eq!(restored.items[2].quantity, 7);
    }

    #[test]
    fn test_loading_flag_is_not_persisted() {
        let mut cart = sample_cart();
        cart.is_loading = true;
        let restored = decode_snapshot(&encode_snapshot(&cart).unwrap()).unwrap();
        assert!(!restored.is_loading);
    }

    #[test]
    fn test_decode_rejects_corrupt_snapshots() {
        assert!(decode_snapshot("{not json").is_err());
        assert!(decode_snapshot(r#"{"version": 99, "items": []}"#).is_err());

        let mut cart = sample_cart();
        cart.items[0].quantity = 0;
        let json = encode_snapshot(&cart).unwrap();
        assert!(matches!(decode_snapshot(&json), Err(DomainError::InvalidInput(_))));

        let mut cart = sample_cart();
        let duplicate = cart.items[0].clone();
        cart.items.push(duplicate);
        let json = encode_snapshot(&cart).unwrap();
        assert!(matches!(decode_snapshot(&json), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_file_repository_round_trip() {
        let dir = TempDir::new().unwrap();
        let repository = FileCartRepository::new(dir.path().join("nested").join("cart.json"));

        assert_eq!(repository.load(), Ok(None));

        let cart = sample_cart();
        repository.save(&cart).unwrap();
        assert_eq!(repository.load(), Ok(Some(cart)));
        assert!(!repository.temp_path().exists());
    }

    #[test]
    fn test_file_repository_reports_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cart.json");
        fs::write(&path, "garbage").unwrap();

        let repository = FileCartRepository::new(&path);
        assert!(matches!(repository.load(), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_decode_rejects_bad_prices() {
        let mut cart = sample_cart();
        cart.items[0].unit_price.amount = dec!(-12.50);
        let json = encode_snapshot(&cart).unwrap();
        assert!(matches!(decode_snapshot(&json), Err(DomainError::InvalidInput(_))));

        let mut cart = sample_cart();
        cart.items[1].unit_price.currency_code = "dollars".to_string();
        let json = encode_snapshot(&cart).unwrap();
        assert!(matches!(decode_snapshot(&json), Err(DomainError::InvalidInput(_))));

        let mut cart = sample_cart();
        cart.items[0].unit_price.amount = rust_decimal::Decimal::MAX;
        let json = encode_snapshot(&cart).unwrap();
        assert!(matches!(decode_snapshot(&json), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_file_repository_treats_non_utf8_as_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cart.json");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x7b]).unwrap();

        let repository = FileCartRepository::new(&path);
        assert!(matches!(repository.load(), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_memory_repository_shares_slot() {
        let repository = MemoryCartRepository::new();
        let handle = repository.clone();
        repository.save(&sample_cart()).unwrap();

        assert!(handle.contents().unwrap().contains("\"version\": 1"));
        assert_eq!(handle.load().unwrap().unwrap().items.len(), 3);
    }
}
