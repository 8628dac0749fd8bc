//! System intents: platform-constructed requests for structured input.
//!
//! The library validates the payload and declares the expected-argument
//! schema; the actual prompt rendering for these flows is owned by the
//! platform at runtime, which is why builders install a placeholder initial
//! prompt instead of developer text.

use serde_json::{Value, json};

use crate::conversation::ApiVersion;
use crate::conversation::intents;
use crate::error::ResponseError;

use super::options::{CarouselSelect, ListSelect, OptionItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Permission {
    #[strum(serialize = "NAME")]
    Name,
    #[strum(serialize = "DEVICE_COARSE_LOCATION")]
    CoarseLocation,
    #[strum(serialize = "DEVICE_PRECISE_LOCATION")]
    PreciseLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptionSelectKind {
    List(ListSelect),
    Carousel(CarouselSelect),
}

/// One structured-input request. Mutually exclusive with a terminal tell;
/// its presence forces `expect_user_response = true`.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemIntent {
    Permission {
        opt_context: String,
        permissions: Vec<Permission>,
    },
    SignIn {
        action_phrase: String,
    },
    Confirmation {
        request_text: String,
    },
    DateTime {
        request_text: String,
        date_text: String,
        time_text: String,
    },
    DeliveryAddress {
        reason: String,
    },
    TransactionRequirements {
        order_options: Value,
        payment_options: Value,
    },
    TransactionDecision {
        proposed_order: Value,
        order_options: Value,
        payment_options: Value,
    },
    OptionSelect(OptionSelectKind),
}

impl SystemIntent {
    // ── Validating constructors ──────────────────────────────────

    pub fn permission(
        opt_context: impl Into<String>,
        permissions: Vec<Permission>,
    ) -> Result<Self, ResponseError> {
        let opt_context = opt_context.into();
        if permissions.is_empty() {
            return Err(ResponseError::InvalidSystemIntent {
                intent: "permission",
                reason: "at least one permission is required".into(),
            });
        }
        if opt_context.trim().is_empty() {
            return Err(ResponseError::InvalidSystemIntent {
                intent: "permission",
                reason: "a non-empty context sentence is required".into(),
            });
        }
        Ok(SystemIntent::Permission {
            opt_context,
            permissions,
        })
    }

    pub fn sign_in(action_phrase: impl Into<String>) -> Result<Self, ResponseError> {
        let action_phrase = action_phrase.into();
        if action_phrase.trim().is_empty() {
            return Err(ResponseError::InvalidSystemIntent {
                intent: "sign-in",
                reason: "a non-empty action phrase is required".into(),
            });
        }
        Ok(SystemIntent::SignIn { action_phrase })
    }

    pub fn confirmation(request_text: impl Into<String>) -> Result<Self, ResponseError> {
        let request_text = request_text.into();
        if request_text.trim().is_empty() {
            return Err(ResponseError::InvalidSystemIntent {
                intent: "confirmation",
                reason: "a non-empty confirmation question is required".into(),
            });
        }
        Ok(SystemIntent::Confirmation { request_text })
    }

    pub fn date_time(
        request_text: impl Into<String>,
        date_text: impl Into<String>,
        time_text: impl Into<String>,
    ) -> Result<Self, ResponseError> {
        let request_text = request_text.into();
        if request_text.trim().is_empty() {
            return Err(ResponseError::InvalidSystemIntent {
                intent: "date-time",
                reason: "a non-empty initial question is required".into(),
            });
        }
        Ok(SystemIntent::DateTime {
            request_text,
            date_text: date_text.into(),
            time_text: time_text.into(),
        })
    }

    pub fn delivery_address(reason: impl Into<String>) -> Result<Self, ResponseError> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(ResponseError::InvalidSystemIntent {
                intent: "delivery address",
                reason: "a non-empty reason is required".into(),
            });
        }
        Ok(SystemIntent::DeliveryAddress { reason })
    }

    pub fn transaction_requirements(
        order_options: Value,
        payment_options: Value,
    ) -> Result<Self, ResponseError> {
        if !order_options.is_object() || !payment_options.is_object() {
            return Err(ResponseError::InvalidSystemIntent {
                intent: "transaction requirements",
                reason: "order and payment options must be objects".into(),
            });
        }
        Ok(SystemIntent::TransactionRequirements {
            order_options,
            payment_options,
        })
    }

    pub fn transaction_decision(
        proposed_order: Value,
        order_options: Value,
        payment_options: Value,
    ) -> Result<Self, ResponseError> {
        if !proposed_order.is_object() {
            return Err(ResponseError::InvalidSystemIntent {
                intent: "transaction decision",
                reason: "a proposed order object is required".into(),
            });
        }
        Ok(SystemIntent::TransactionDecision {
            proposed_order,
            order_options,
            payment_options,
        })
    }

    pub fn list(list: ListSelect) -> Result<Self, ResponseError> {
        list.validate()?;
        Ok(SystemIntent::OptionSelect(OptionSelectKind::List(list)))
    }

    pub fn carousel(carousel: CarouselSelect) -> Result<Self, ResponseError> {
        carousel.validate()?;
        Ok(SystemIntent::OptionSelect(OptionSelectKind::Carousel(
            carousel,
        )))
    }

    // ── Wire projection ──────────────────────────────────────────

    /// Built-in intent id declared as the expected input. Generation 1 only
    /// ever shipped the permission flow; the remaining intents keep their
    /// generation-2 ids there, which the platform ignores gracefully.
    pub fn intent_id(&self, version: ApiVersion) -> &'static str {
        match (self, version) {
            (SystemIntent::Permission { .. }, ApiVersion::V1) => intents::v1::PERMISSION,
            (SystemIntent::Permission { .. }, ApiVersion::V2) => intents::v2::PERMISSION,
            (SystemIntent::SignIn { .. }, _) => intents::v2::SIGN_IN,
            (SystemIntent::Confirmation { .. }, _) => intents::v2::CONFIRMATION,
            (SystemIntent::DateTime { .. }, _) => intents::v2::DATETIME,
            (SystemIntent::DeliveryAddress { .. }, _) => intents::v2::DELIVERY_ADDRESS,
            (SystemIntent::TransactionRequirements { .. }, _) => {
                intents::v2::TRANSACTION_REQUIREMENTS_CHECK
            }
            (SystemIntent::TransactionDecision { .. }, _) => intents::v2::TRANSACTION_DECISION,
            (SystemIntent::OptionSelect(_), _) => intents::v2::OPTION,
        }
    }

    fn spec_name(&self) -> &'static str {
        match self {
            SystemIntent::Permission { .. } => "PermissionValueSpec",
            SystemIntent::SignIn { .. } => "SignInValueSpec",
            SystemIntent::Confirmation { .. } => "ConfirmationValueSpec",
            SystemIntent::DateTime { .. } => "DateTimeValueSpec",
            SystemIntent::DeliveryAddress { .. } => "DeliveryAddressValueSpec",
            SystemIntent::TransactionRequirements { .. } => "TransactionRequirementsCheckSpec",
            SystemIntent::TransactionDecision { .. } => "TransactionDecisionValueSpec",
            SystemIntent::OptionSelect(_) => "OptionValueSpec",
        }
    }

    /// Placeholder initial prompt installed alongside the intent; the
    /// platform substitutes its own flow text at runtime.
    pub fn placeholder_prompt(&self) -> String {
        let tag = match self {
            SystemIntent::Permission { .. } => "PERMISSION",
            SystemIntent::SignIn { .. } => "SIGN_IN",
            SystemIntent::Confirmation { .. } => "CONFIRMATION",
            SystemIntent::DateTime { .. } => "DATETIME",
            SystemIntent::DeliveryAddress { .. } => "DELIVERY_ADDRESS",
            SystemIntent::TransactionRequirements { .. } => "TXN_REQUIREMENTS",
            SystemIntent::TransactionDecision { .. } => "TXN_DECISION",
            SystemIntent::OptionSelect(_) => "OPTION",
        };
        format!("PLACEHOLDER_FOR_{tag}")
    }

    /// Expected-argument value spec in the generation's field naming.
    /// Generation 2 tags the object with `@type`; generation 1 nests it
    /// under a `<intent>_value_spec` key instead (see
    /// [`Self::v1_spec_key`]).
    pub fn value_spec(&self, version: ApiVersion) -> Value {
        let mut spec = match (self, version) {
            (
                SystemIntent::Permission {
                    opt_context,
                    permissions,
                },
                ApiVersion::V1,
            ) => json!({
                "opt_context": opt_context,
                "permissions": permissions.iter().map(ToString::to_string).collect::<Vec<_>>(),
            }),
            (
                SystemIntent::Permission {
                    opt_context,
                    permissions,
                },
                ApiVersion::V2,
            ) => json!({
                "optContext": opt_context,
                "permissions": permissions.iter().map(ToString::to_string).collect::<Vec<_>>(),
            }),
            (SystemIntent::SignIn { action_phrase }, ApiVersion::V1) => {
                json!({"action_phrase": action_phrase})
            }
            (SystemIntent::SignIn { action_phrase }, ApiVersion::V2) => {
                json!({"actionPhrase": action_phrase})
            }
            (SystemIntent::Confirmation { request_text }, ApiVersion::V1) => {
                json!({"dialog_spec": {"request_confirmation_text": request_text}})
            }
            (SystemIntent::Confirmation { request_text }, ApiVersion::V2) => {
                json!({"dialogSpec": {"requestConfirmationText": request_text}})
            }
            (
                SystemIntent::DateTime {
                    request_text,
                    date_text,
                    time_text,
                },
                ApiVersion::V1,
            ) => json!({
                "dialog_spec": {
                    "request_datetime_text": request_text,
                    "request_date_text": date_text,
                    "request_time_text": time_text,
                }
            }),
            (
                SystemIntent::DateTime {
                    request_text,
                    date_text,
                    time_text,
                },
                ApiVersion::V2,
            ) => json!({
                "dialogSpec": {
                    "requestDatetimeText": request_text,
                    "requestDateText": date_text,
                    "requestTimeText": time_text,
                }
            }),
            (SystemIntent::DeliveryAddress { reason }, ApiVersion::V1) => {
                json!({"address_options": {"reason": reason}})
            }
            (SystemIntent::DeliveryAddress { reason }, ApiVersion::V2) => {
                json!({"addressOptions": {"reason": reason}})
            }
            (
                SystemIntent::TransactionRequirements {
                    order_options,
                    payment_options,
                },
                ApiVersion::V1,
            ) => json!({
                "order_options": order_options,
                "payment_options": payment_options,
            }),
            (
                SystemIntent::TransactionRequirements {
                    order_options,
                    payment_options,
                },
                ApiVersion::V2,
            ) => json!({
                "orderOptions": order_options,
                "paymentOptions": payment_options,
            }),
            (
                SystemIntent::TransactionDecision {
                    proposed_order,
                    order_options,
                    payment_options,
                },
                ApiVersion::V1,
            ) => json!({
                "proposed_order": proposed_order,
                "order_options": order_options,
                "payment_options": payment_options,
            }),
            (
                SystemIntent::TransactionDecision {
                    proposed_order,
                    order_options,
                    payment_options,
                },
                ApiVersion::V2,
            ) => json!({
                "proposedOrder": proposed_order,
                "orderOptions": order_options,
                "paymentOptions": payment_options,
            }),
            (SystemIntent::OptionSelect(kind), version) => option_select_spec(kind, version),
        };
        if version == ApiVersion::V2 {
            if let Value::Object(ref mut map) = spec {
                map.insert(
                    "@type".into(),
                    Value::String(format!(
                        "{}{}",
                        intents::VALUE_SPEC_TYPE_PREFIX,
                        self.spec_name()
                    )),
                );
            }
        }
        spec
    }

    /// Generation-1 wrapper key for the value spec, e.g.
    /// `permission_value_spec`.
    pub fn v1_spec_key(&self) -> &'static str {
        match self {
            SystemIntent::Permission { .. } => "permission_value_spec",
            SystemIntent::SignIn { .. } => "sign_in_value_spec",
            SystemIntent::Confirmation { .. } => "confirmation_value_spec",
            SystemIntent::DateTime { .. } => "date_time_value_spec",
            SystemIntent::DeliveryAddress { .. } => "delivery_address_value_spec",
            SystemIntent::TransactionRequirements { .. } => "transaction_requirements_check_spec",
            SystemIntent::TransactionDecision { .. } => "transaction_decision_value_spec",
            SystemIntent::OptionSelect(_) => "option_value_spec",
        }
    }
}

fn option_select_spec(kind: &OptionSelectKind, version: ApiVersion) -> Value {
    match (kind, version) {
        (OptionSelectKind::List(list), v) => {
            let key = match v {
                ApiVersion::V1 => "list_select",
                ApiVersion::V2 => "listSelect",
            };
            json!({
                key: {
                    "title": list.title.clone().unwrap_or_default(),
                    "items": list.items.iter().map(|i| option_item_json(i, v)).collect::<Vec<_>>(),
                }
            })
        }
        (OptionSelectKind::Carousel(carousel), v) => {
            let key = match v {
                ApiVersion::V1 => "carousel_select",
                ApiVersion::V2 => "carouselSelect",
            };
            json!({
                key: {
                    "items": carousel
                        .items
                        .iter()
                        .map(|i| option_item_json(i, v))
                        .collect::<Vec<_>>(),
                }
            })
        }
    }
}

fn option_item_json(item: &OptionItem, version: ApiVersion) -> Value {
    let info_key = match version {
        ApiVersion::V1 => "option_info",
        ApiVersion::V2 => "optionInfo",
    };
    let mut out = json!({
        info_key: {
            "key": item.key,
            "synonyms": item.synonyms,
        },
        "title": item.title,
    });
    let obj = out.as_object_mut().expect("literal object");
    if let Some(ref description) = item.description {
        obj.insert("description".into(), json!(description));
    }
    if let Some(ref image) = item.image {
        let alt_key = match version {
            ApiVersion::V1 => "accessibility_text",
            ApiVersion::V2 => "accessibilityText",
        };
        obj.insert(
            "image".into(),
            json!({"url": image.url, alt_key: image.accessibility_text}),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_requires_at_least_one() {
        let err = SystemIntent::permission("To find you", vec![]).unwrap_err();
        assert!(matches!(
            err,
            ResponseError::InvalidSystemIntent { intent: "permission", .. }
        ));
    }

    #[test]
    fn permission_requires_context() {
        let err = SystemIntent::permission("  ", vec![Permission::Name]).unwrap_err();
        assert!(matches!(
            err,
            ResponseError::InvalidSystemIntent { intent: "permission", .. }
        ));
    }

    #[test]
    fn permission_spec_v2_carries_type_tag() {
        let intent = SystemIntent::permission(
            "To address you",
            vec![Permission::Name, Permission::CoarseLocation],
        )
        .unwrap();
        let spec = intent.value_spec(ApiVersion::V2);
        assert_eq!(spec["@type"], "type.assistant.api/PermissionValueSpec");
        assert_eq!(spec["optContext"], "To address you");
        assert_eq!(spec["permissions"][1], "DEVICE_COARSE_LOCATION");
    }

    #[test]
    fn permission_spec_v1_is_snake_case_untagged() {
        let intent = SystemIntent::permission("To address you", vec![Permission::Name]).unwrap();
        let spec = intent.value_spec(ApiVersion::V1);
        assert!(spec.get("@type").is_none());
        assert_eq!(spec["opt_context"], "To address you");
        assert_eq!(intent.v1_spec_key(), "permission_value_spec");
    }

    #[test]
    fn sign_in_requires_action_phrase() {
        assert!(SystemIntent::sign_in("").is_err());
        let intent = SystemIntent::sign_in("save your score").unwrap();
        assert_eq!(
            intent.value_spec(ApiVersion::V2)["actionPhrase"],
            "save your score"
        );
    }

    #[test]
    fn intent_id_follows_generation_for_permission() {
        let intent = SystemIntent::permission("ctx", vec![Permission::Name]).unwrap();
        assert_eq!(
            intent.intent_id(ApiVersion::V1),
            "assistant.intent.action.PERMISSION"
        );
        assert_eq!(intent.intent_id(ApiVersion::V2), "assistant.intent.PERMISSION");
    }

    #[test]
    fn list_spec_nests_option_info() {
        let list = ListSelect::new()
            .with_title("pick")
            .with_item(OptionItem::new("a", "Alpha").with_synonyms(["first"]))
            .with_item(OptionItem::new("b", "Beta"));
        let intent = SystemIntent::list(list).unwrap();
        let spec = intent.value_spec(ApiVersion::V2);
        assert_eq!(spec["listSelect"]["title"], "pick");
        assert_eq!(spec["listSelect"]["items"][0]["optionInfo"]["key"], "a");
        assert_eq!(
            spec["listSelect"]["items"][0]["optionInfo"]["synonyms"][0],
            "first"
        );
    }

    #[test]
    fn undersized_list_rejected_at_construction() {
        let err = SystemIntent::list(ListSelect::new().with_item(OptionItem::new("a", "A")))
            .unwrap_err();
        assert!(matches!(err, ResponseError::TooFewItems { kind: "list", got: 1 }));
    }

    #[test]
    fn transaction_decision_requires_order_object() {
        assert!(SystemIntent::transaction_decision(json!(null), json!({}), json!({})).is_err());
        let ok = SystemIntent::transaction_decision(
            json!({"id": "order-1"}),
            json!({}),
            json!({}),
        )
        .unwrap();
        assert_eq!(
            ok.value_spec(ApiVersion::V2)["proposedOrder"]["id"],
            "order-1"
        );
    }

    #[test]
    fn placeholder_prompts_name_their_flow() {
        let intent = SystemIntent::sign_in("x").unwrap();
        assert_eq!(intent.placeholder_prompt(), "PLACEHOLDER_FOR_SIGN_IN");
    }
}
