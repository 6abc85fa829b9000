//! Orchestrates the two classifier tiers and canonicalizes their output.
//!
//! The fast path runs first for plain text; voice always goes to the
//! generative tier because the lexical rules only understand text. Whatever
//! tier produced the intent, the same normalization applies afterwards:
//! `qty × price` derivation for sales, and outstanding-balance inference for
//! payments stated without an amount.

use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use crate::classifier;
use crate::error::{AssistantError, Result};
use crate::intent::{RawIntent, ResolvedIntent, TransactionDraft};
use crate::ledger::LedgerStore;
use crate::query::LedgerQueryEngine;
use crate::AudioClip;

/// Terminal classification tier. Implementations must not fail past this
/// boundary: backend trouble of any kind degrades to
/// `RawIntent::unrecognized()`, which the pipeline treats as a normal
/// outcome rather than an error.
#[async_trait]
pub trait IntentExtractor: Send + Sync {
    async fn extract(&self, text: &str, audio: Option<&AudioClip>) -> RawIntent;
}

pub struct IntentResolver {
    extractor: Arc<dyn IntentExtractor>,
    queries: LedgerQueryEngine,
}

impl IntentResolver {
    pub fn new(extractor: Arc<dyn IntentExtractor>, store: Arc<dyn LedgerStore>) -> Self {
        Self {
            extractor,
            queries: LedgerQueryEngine::new(store),
        }
    }

    pub async fn resolve(
        &self,
        owner_id: &str,
        text: &str,
        audio: Option<&AudioClip>,
    ) -> Result<ResolvedIntent> {
        let intent = if audio.is_none() {
            match classifier::classify(text) {
                Some(intent) => {
                    debug!("fast path classified message: {:?}", intent);
                    intent
                }
                None => self.extract(text, audio).await,
            }
        } else {
            self.extract(text, audio).await
        };

        self.normalize(owner_id, intent).await
    }

    async fn extract(&self, text: &str, audio: Option<&AudioClip>) -> ResolvedIntent {
        let raw = self.extractor.extract(text, audio).await;
        debug!("fallback extraction produced: {:?}", raw);
        ResolvedIntent::from_raw(raw)
    }

    async fn normalize(&self, owner_id: &str, intent: ResolvedIntent) -> Result<ResolvedIntent> {
        match intent {
            ResolvedIntent::CreateSale(mut draft) => {
                if draft.amount.is_none() {
                    if let (Some(qty), Some(price)) = (draft.qty, draft.price) {
                        draft.amount = Some(f64::from(qty) * price);
                    }
                }
                require_amount(&draft, "sale")?;
                Ok(ResolvedIntent::CreateSale(draft))
            }
            ResolvedIntent::CreateCredit(draft) => {
                require_amount(&draft, "credit")?;
                Ok(ResolvedIntent::CreateCredit(draft))
            }
            ResolvedIntent::CreatePayment(mut draft) => {
                if draft.amount.is_none() {
                    draft.amount = Some(self.infer_payment_amount(owner_id, &draft).await?);
                }
                require_amount(&draft, "payment")?;
                Ok(ResolvedIntent::CreatePayment(draft))
            }
            other => Ok(other),
        }
    }

    /// Full-settlement inference: a payment with no stated amount settles the
    /// person's entire outstanding balance. The only place in the core where
    /// the write path reads the ledger.
    async fn infer_payment_amount(&self, owner_id: &str, draft: &TransactionDraft) -> Result<f64> {
        let person = draft
            .person
            .as_deref()
            .ok_or(AssistantError::PaymentDetailsMissing)?;
        let balance = self.queries.person_credit(owner_id, person).await?;
        if balance <= 0.0 {
            return Err(AssistantError::NothingOutstanding(person.to_string()));
        }
        debug!(
            "settling full outstanding balance {} for {}",
            balance, person
        );
        Ok(balance)
    }
}

fn require_amount(draft: &TransactionDraft, kind: &str) -> Result<()> {
    match draft.amount {
        Some(amount) if amount.is_finite() && amount > 0.0 => Ok(()),
        _ => Err(AssistantError::InvalidTransaction(format!(
            "{} needs a positive amount",
            kind
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{LedgerEntry, MemoryLedger, TransactionType};
    use crate::utils::today;
    use chrono::Utc;

    struct ScriptedExtractor(RawIntent);

    #[async_trait]
    impl IntentExtractor for ScriptedExtractor {
        async fn extract(&self, _text: &str, _audio: Option<&AudioClip>) -> RawIntent {
            self.0.clone()
        }
    }

    fn resolver_with(raw: RawIntent) -> (IntentResolver, Arc<MemoryLedger>) {
        let store = Arc::new(MemoryLedger::new());
        let resolver = IntentResolver::new(Arc::new(ScriptedExtractor(raw)), store.clone());
        (resolver, store)
    }

    async fn credit(store: &MemoryLedger, person: &str, amount: f64) {
        store
            .append(LedgerEntry {
                owner_id: "shop".to_string(),
                entry_type: TransactionType::Credit,
                item: None,
                qty: None,
                amount,
                person_name: Some(person.to_string()),
                occurred_on: today(),
                recorded_at: Utc::now(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_fast_path_skips_extractor() {
        // Scripted extractor would answer GetWeekSummary; the lexical tier
        // must win for an unambiguous phrasing.
        let (resolver, _) = resolver_with(RawIntent {
            intent: Some("get_week_summary".to_string()),
            ..RawIntent::default()
        });
        let intent = resolver
            .resolve("shop", "aaj ki sale kitni hui", None)
            .await
            .unwrap();
        assert_eq!(intent, ResolvedIntent::GetTodaySales);
    }

    #[tokio::test]
    async fn test_audio_always_uses_extractor() {
        let (resolver, _) = resolver_with(RawIntent {
            intent: Some("get_week_summary".to_string()),
            ..RawIntent::default()
        });
        let clip = AudioClip {
            data_base64: "AAAA".to_string(),
            mime_type: "audio/ogg".to_string(),
        };
        let intent = resolver
            .resolve("shop", "aaj ki sale kitni hui", Some(&clip))
            .await
            .unwrap();
        assert_eq!(intent, ResolvedIntent::GetWeekSummary);
    }

    #[tokio::test]
    async fn test_qty_price_derives_amount() {
        let (resolver, _) = resolver_with(RawIntent {
            intent: Some("create_sale".to_string()),
            item: Some("maggie".to_string()),
            qty: Some(12),
            price: Some(20.0),
            ..RawIntent::default()
        });
        match resolver.resolve("shop", "maggie 12 packet 20 rupees", None).await {
            Ok(ResolvedIntent::CreateSale(draft)) => assert_eq!(draft.amount, Some(240.0)),
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sale_without_amount_or_qty_price_is_rejected() {
        let (resolver, _) = resolver_with(RawIntent {
            intent: Some("create_sale".to_string()),
            item: Some("maggie".to_string()),
            ..RawIntent::default()
        });
        let result = resolver.resolve("shop", "maggie biki", None).await;
        assert!(matches!(
            result,
            Err(AssistantError::InvalidTransaction(_))
        ));
    }

    #[tokio::test]
    async fn test_full_repayment_settles_outstanding_balance() {
        let (resolver, store) = resolver_with(RawIntent::unrecognized());
        credit(&store, "Rahul", 500.0).await;

        let intent = resolver
            .resolve("shop", "Rahul ne sara udhar wapas diya", None)
            .await
            .unwrap();
        match intent {
            ResolvedIntent::CreatePayment(draft) => {
                assert_eq!(draft.person.as_deref(), Some("Rahul"));
                assert_eq!(draft.amount, Some(500.0));
            }
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_full_repayment_with_zero_balance_is_rejected() {
        let (resolver, _) = resolver_with(RawIntent::unrecognized());
        let result = resolver
            .resolve("shop", "Rahul ne sara udhar wapas diya", None)
            .await;
        assert!(matches!(
            result,
            Err(AssistantError::NothingOutstanding(person)) if person == "Rahul"
        ));
    }

    #[tokio::test]
    async fn test_payment_without_person_or_amount_prompts() {
        let (resolver, _) = resolver_with(RawIntent {
            intent: Some("create_payment".to_string()),
            ..RawIntent::default()
        });
        let result = resolver.resolve("shop", "payment aa gaya", None).await;
        assert!(matches!(result, Err(AssistantError::PaymentDetailsMissing)));
    }

    #[tokio::test]
    async fn test_unknown_intent_name_becomes_unrecognized() {
        let (resolver, _) = resolver_with(RawIntent {
            intent: Some("order_pizza".to_string()),
            ..RawIntent::default()
        });
        let intent = resolver.resolve("shop", "order a pizza", None).await.unwrap();
        assert_eq!(intent, ResolvedIntent::Unrecognized);
    }

    #[tokio::test]
    async fn test_read_intents_pass_through() {
        let (resolver, _) = resolver_with(RawIntent {
            intent: Some("get_person_credit".to_string()),
            person: Some("Ramesh".to_string()),
            ..RawIntent::default()
        });
        let intent = resolver
            .resolve("shop", "how much does ramesh owe", None)
            .await
            .unwrap();
        assert_eq!(
            intent,
            ResolvedIntent::GetPersonCredit {
                person: Some("Ramesh".to_string())
            }
        );
    }
}
