//! Wire pieces shared by the cart and order resources.

use std::collections::BTreeMap;

use joinery::{
    customization::Customization,
    items::{ItemKind, ItemReference},
    pricing::Amount,
};
use salvo::prelude::StatusError;
use uuid::Uuid;

use crate::extensions::*;

/// Customization choices as a flat JSON object, e.g. `{"color": "red"}`.
pub(crate) type CustomizationBody = BTreeMap<String, String>;

/// Resolve `itemKind`/`itemUuid` into an item reference; unknown kinds are `400`.
pub(crate) fn parse_item(kind: &str, uuid: Uuid) -> Result<ItemReference, StatusError> {
    let kind = kind.parse::<ItemKind>().or_400()?;

    Ok(ItemReference::from_parts(kind, uuid))
}

pub(crate) fn customization_from_body(body: CustomizationBody) -> Customization {
    body.into_iter().collect()
}

pub(crate) fn customization_body(customization: &Customization) -> CustomizationBody {
    customization
        .iter()
        .map(|(option, value)| (option.to_string(), value.clone()))
        .collect()
}

pub(crate) fn currency_code(amount: &Amount) -> String {
    amount.currency().iso_alpha_code.to_string()
}
