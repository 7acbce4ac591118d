//! Product models and DTOs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::ids::{ProductId, UserId};
use crate::roles::Role;

/// Digits allowed after the decimal point.
pub const PRICE_SCALE: u32 = 2;
/// Total digits allowed in a price.
pub const PRICE_MAX_DIGITS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    pub stock: i32,
    #[serde(rename = "owner")]
    pub owner_id: UserId,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for inserting a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    pub owner_id: UserId,
    pub is_public: bool,
}

/// Partial product update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub is_public: Option<bool>,
}

/// The set of products a subject may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductScope {
    /// Every product.
    All,
    /// Products flagged public.
    PublicOnly,
    /// Products owned by the given user.
    OwnedBy(UserId),
}

impl ProductScope {
    /// ADMIN sees everything, STAFF sees public products, CLIENTE sees its own.
    pub fn for_subject(role: Role, user_id: UserId) -> Self {
        match role {
            Role::Admin => ProductScope::All,
            Role::Staff => ProductScope::PublicOnly,
            Role::Cliente => ProductScope::OwnedBy(user_id),
        }
    }

    pub fn admits(&self, product: &Product) -> bool {
        match self {
            ProductScope::All => true,
            ProductScope::PublicOnly => product.is_public,
            ProductScope::OwnedBy(owner) => product.owner_id == *owner,
        }
    }
}

/// Non-negative, at most two decimal places, at most ten digits overall.
pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    let fail = |code: &'static str, message: &'static str| {
        let mut error = ValidationError::new(code);
        error.message = Some(message.into());
        Err(error)
    };

    if price.is_sign_negative() && !price.is_zero() {
        return fail("negative_price", "Price must not be negative.");
    }

    let normalized = price.normalize();
    if normalized.scale() > PRICE_SCALE {
        return fail("price_scale", "Ensure that there are no more than 2 decimal places.");
    }

    let integer_part = normalized.trunc().abs().to_string();
    let integer_digits = integer_part.trim_start_matches('0').len() as u32;
    if integer_digits > PRICE_MAX_DIGITS - PRICE_SCALE {
        return fail(
            "price_digits",
            "Ensure that there are no more than 8 digits before the decimal point.",
        );
    }

    Ok(())
}

/// Create payload. Any `owner` field in the body is ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProductDto {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[schema(example = "Desk lamp")]
    pub name: String,
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    #[schema(example = 25)]
    pub stock: i32,
    #[serde(default)]
    pub is_public: bool,
}

/// Update payload for PUT and PATCH. PUT requires every field except `is_public`.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProductDto {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub is_public: Option<bool>,
}

impl From<UpdateProductDto> for ProductChanges {
    fn from(dto: UpdateProductDto) -> Self {
        Self {
            name: dto.name,
            price: dto.price,
            stock: dto.stock,
            is_public: dto.is_public,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn product(owner_id: UserId, is_public: bool) -> Product {
        Product {
            id: ProductId::new(),
            name: "Lamp".to_string(),
            price: dec("19.99"),
            stock: 3,
            owner_id,
            is_public,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_scope_per_role() {
        let me = UserId::new();
        assert_eq!(ProductScope::for_subject(Role::Admin, me), ProductScope::All);
        assert_eq!(ProductScope::for_subject(Role::Staff, me), ProductScope::PublicOnly);
        assert_eq!(ProductScope::for_subject(Role::Cliente, me), ProductScope::OwnedBy(me));
    }

    #[test]
    fn test_scope_admits() {
        let me = UserId::new();
        let other = UserId::new();
        let mine_private = product(me, false);
        let theirs_public = product(other, true);
        let theirs_private = product(other, false);

        assert!(ProductScope::All.admits(&theirs_private));

        assert!(ProductScope::PublicOnly.admits(&theirs_public));
        assert!(!ProductScope::PublicOnly.admits(&mine_private));

        let own = ProductScope::OwnedBy(me);
        assert!(own.admits(&mine_private));
        assert!(!own.admits(&theirs_public));
    }

    #[test]
    fn test_valid_prices() {
        assert!(validate_price(&dec("0")).is_ok());
        assert!(validate_price(&dec("19.99")).is_ok());
        assert!(validate_price(&dec("10.50")).is_ok());
        assert!(validate_price(&dec("99999999.99")).is_ok());
    }

    #[test]
    fn test_negative_price_rejected() {
        let err = validate_price(&dec("-1.00")).unwrap_err();
        assert_eq!(err.code, "negative_price");
    }

    #[test]
    fn test_three_decimals_rejected() {
        let err = validate_price(&dec("1.999")).unwrap_err();
        assert_eq!(err.code, "price_scale");
    }

    #[test]
    fn test_trailing_zeros_allowed() {
        assert!(validate_price(&dec("1.500")).is_ok());
    }

    #[test]
    fn test_too_many_digits_rejected() {
        let err = validate_price(&dec("123456789.00")).unwrap_err();
        assert_eq!(err.code, "price_digits");
    }

    #[test]
    fn test_create_dto_accepts_string_and_number_prices() {
        let from_string: CreateProductDto =
            serde_json::from_str(r#"{"name":"Lamp","price":"19.99","stock":3}"#).unwrap();
        let from_number: CreateProductDto =
            serde_json::from_str(r#"{"name":"Lamp","price":19.99,"stock":3}"#).unwrap();
        assert_eq!(from_string.price, dec("19.99"));
        assert_eq!(from_number.price, dec("19.99"));
        assert!(!from_string.is_public);
    }

    #[test]
    fn test_create_dto_ignores_owner() {
        let dto: CreateProductDto = serde_json::from_str(
            r#"{"name":"Lamp","price":"5","stock":1,"owner":"12345678-1234-1234-1234-123456789abc"}"#,
        )
        .unwrap();
        assert_eq!(dto.name, "Lamp");
    }

    #[test]
    fn test_product_serializes_owner_and_price_as_string() {
        let json = serde_json::to_value(product(UserId::new(), true)).unwrap();
        assert_eq!(json["price"], "19.99");
        assert!(json.get("owner").is_some());
        assert!(json.get("owner_id").is_none());
    }
}
