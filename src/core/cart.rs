use crate::domain::model::{CartItem, CartItemCustom, Product};
use crate::domain::money::Money;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use serde::de::DeserializeOwned;

/// Storage key of the standard basket.
pub const CART_KEY: &str = "cart.json";
/// Storage key of the customised bouquets.
pub const CUSTOM_CART_KEY: &str = "cart-custom.json";
/// Largest quantity a single basket line can hold.
pub const MAX_QUANTITY: u32 = 999;

/// Which of the two persisted lists a mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartList {
    Standard,
    Custom,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
    custom_items: Vec<CartItemCustom>,
}

impl Cart {
    pub fn new(items: Vec<CartItem>, custom_items: Vec<CartItemCustom>) -> Self {
        Self {
            items,
            custom_items,
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn custom_items(&self) -> &[CartItemCustom] {
        &self.custom_items
    }

    /// Adding a product already in the basket increases its quantity, up to [`MAX_QUANTITY`].
    pub fn add_product(&mut self, product: &Product, quantity: u32) {
        let quantity = quantity.clamp(1, MAX_QUANTITY);
        match self.items.iter_mut().find(|item| item.product.id == product.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(quantity).min(MAX_QUANTITY)
            }
            None => self.items.push(CartItem {
                product: product.clone(),
                quantity,
            }),
        }
    }

    pub fn add_custom(&mut self, item: CartItemCustom) {
        self.custom_items.push(item);
    }

    pub fn remove(&mut self, id: &str) -> Option<CartList> {
        if let Some(pos) = self.items.iter().position(|item| item.product.id == id) {
            self.items.remove(pos);
            return Some(CartList::Standard);
        }
        if let Some(pos) = self.custom_items.iter().position(|item| item.id == id) {
            self.custom_items.remove(pos);
            return Some(CartList::Custom);
        }
        None
    }

    /// Quantities stay within `1..=MAX_QUANTITY`; use [`Cart::remove`] to take an item out.
    pub fn update_quantity(&mut self, id: &str, delta: i64) -> Option<CartList> {
        if let Some(item) = self.items.iter_mut().find(|item| item.product.id == id) {
            item.quantity = adjusted_quantity(item.quantity, delta);
            return Some(CartList::Standard);
        }
        if let Some(item) = self.custom_items.iter_mut().find(|item| item.id == id) {
            let unit_price = item.unit_price();
            item.quantity = adjusted_quantity(item.quantity, delta);
            item.total_price = unit_price * item.quantity;
            return Some(CartList::Custom);
        }
        None
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.custom_items.clear();
    }

    /// Number of bouquets, counting quantities.
    pub fn count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| item.quantity)
            .chain(self.custom_items.iter().map(|item| item.quantity))
            .map(u64::from)
            .sum()
    }

    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum::<Money>()
            + self
                .custom_items
                .iter()
                .map(|item| item.total_price)
                .sum::<Money>()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.custom_items.is_empty()
    }
}

fn adjusted_quantity(current: u32, delta: i64) -> u32 {
    // 從磁碟讀回的數量可能超過上限
    let current = i64::from(current.min(MAX_QUANTITY));
    current.saturating_add(delta).clamp(1, i64::from(MAX_QUANTITY)) as u32
}

/// The basket plus its persistence: both lists are read once when the store
/// opens and the touched list is rewritten after every mutation.
pub struct CartStore<S: Storage> {
    storage: S,
    cart: Cart,
}

impl<S: Storage> CartStore<S> {
    /// Unreadable or corrupt lists start empty.
    pub async fn open(storage: S) -> Self {
        let items = load_list::<_, CartItem>(&storage, CART_KEY).await;
        let custom_items = load_list::<_, CartItemCustom>(&storage, CUSTOM_CART_KEY).await;
        tracing::debug!(
            "🛒 Loaded basket: {} standard, {} custom items",
            items.len(),
            custom_items.len()
        );

        Self {
            storage,
            cart: Cart::new(items, custom_items),
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub async fn add_product(&mut self, product: &Product, quantity: u32) -> Result<()> {
        self.cart.add_product(product, quantity);
        self.persist(CartList::Standard).await
    }

    pub async fn add_custom(&mut self, item: CartItemCustom) -> Result<()> {
        self.cart.add_custom(item);
        self.persist(CartList::Custom).await
    }

    /// Returns whether an item with that id was in the basket.
    pub async fn remove(&mut self, id: &str) -> Result<bool> {
        match self.cart.remove(id) {
            Some(list) => {
                self.persist(list).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn update_quantity(&mut self, id: &str, delta: i64) -> Result<bool> {
        match self.cart.update_quantity(id, delta) {
            Some(list) => {
                self.persist(list).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn clear(&mut self) -> Result<()> {
        self.cart.clear();
        self.persist(CartList::Standard).await?;
        self.persist(CartList::Custom).await
    }

    async fn persist(&self, list: CartList) -> Result<()> {
        let (key, data) = match list {
            CartList::Standard => (CART_KEY, serde_json::to_vec(self.cart.items())?),
            CartList::Custom => (CUSTOM_CART_KEY, serde_json::to_vec(self.cart.custom_items())?),
        };
        self.storage.write_key(key, &data).await
    }
}

async fn load_list<S: Storage, T: DeserializeOwned>(storage: &S, key: &str) -> Vec<T> {
    match storage.read_key(key).await {
        Ok(Some(bytes)) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            tracing::warn!("⚠️ Stored basket '{}' is unreadable, starting empty: {}", key, e);
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!("⚠️ Cannot read basket '{}', starting empty: {}", key, e);
            Vec::new()
        }
    }
}
