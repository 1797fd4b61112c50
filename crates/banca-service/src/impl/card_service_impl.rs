//! Tiered bank card service implementation.

use crate::cache::CardCache;
use crate::card_service::CardService;
use crate::dto::{CardResponse, CreateCardRequest, UpdateCardRequest};
use crate::mappers;
use banca_core::{BancaError, BancaResult, CardNumber, ClientId, ValidateExt};
use banca_remote::RemoteBankCardRepository;
use banca_repository::BankCardRepository;
use async_trait::async_trait;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Bank card service over the three tiers, keyed by card number.
///
/// Same resolution and write ordering as the client service; card
/// mutations do not publish notification events.
#[derive(Component)]
#[shaku(interface = CardService)]
pub struct CardServiceImpl {
    #[shaku(inject)]
    local_repository: Arc<dyn BankCardRepository>,
    #[shaku(inject)]
    remote_repository: Arc<dyn RemoteBankCardRepository>,
    cache: Arc<CardCache>,
}

impl CardServiceImpl {
    /// Creates a new card service.
    #[must_use]
    pub fn new(
        local_repository: Arc<dyn BankCardRepository>,
        remote_repository: Arc<dyn RemoteBankCardRepository>,
        cache: Arc<CardCache>,
    ) -> Self {
        Self {
            local_repository,
            remote_repository,
            cache,
        }
    }

    fn log_mirror_failure(&self, number: &CardNumber, action: &str, err: &BancaError) {
        let mirror = BancaError::LocalMirrorFailed(err.to_string());
        warn!(error = %mirror, card = %number, "Local {} failed", action);
    }
}

#[async_trait]
impl CardService for CardServiceImpl {
    async fn find_all_cards(&self) -> BancaResult<Vec<CardResponse>> {
        debug!("Finding all cards");

        let cards = self.remote_repository.get_all().await?;
        Ok(cards.into_iter().map(CardResponse::from).collect())
    }

    async fn find_cards_by_client_id(&self, id: ClientId) -> BancaResult<Vec<CardResponse>> {
        debug!("Finding cards for client: {}", id);

        match self.local_repository.find_by_client_id(id).await {
            Ok(cards) => Ok(cards.into_iter().map(CardResponse::from).collect()),
            Err(e) => {
                warn!(error = %e, client_id = %id, "Local store list failed, asking remote");
                let cards = self.remote_repository.get_all().await?;
                Ok(cards
                    .into_iter()
                    .filter(|card| card.client_id == Some(id))
                    .map(CardResponse::from)
                    .collect())
            }
        }
    }

    async fn find_card_by_number(&self, number: &CardNumber) -> BancaResult<CardResponse> {
        debug!("Finding card by number: {}", number);

        if let Some(card) = self.cache.get(number) {
            debug!("Card {} served from cache", number);
            return Ok(CardResponse::from(card));
        }

        match self.local_repository.find_by_number(number).await {
            Ok(Some(card)) => {
                debug!("Card {} found in local store", number);
                self.cache.insert(number.clone(), card.clone());
                return Ok(CardResponse::from(card));
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, card = %number, "Local store read failed"),
        }

        let card = self.remote_repository.get_by_number(number).await?;
        debug!("Card {} found in remote store", number);

        self.cache.insert(number.clone(), card.clone());
        if let Err(e) = self.local_repository.save(&card).await {
            self.log_mirror_failure(number, "backfill", &e);
        }

        Ok(CardResponse::from(card))
    }

    async fn save_card(&self, request: CreateCardRequest) -> BancaResult<CardResponse> {
        debug!("Saving card: {}", request.number);

        request.validate_request()?;
        let card = mappers::card_from_create(&request);
        let number = card.number.clone();

        // duplicate prevention consults cache and local store only
        if self.cache.get(&number).is_some() {
            return Err(BancaError::already_exists(format!(
                "Card {} already exists in the cache",
                number
            )));
        }
        match self.local_repository.find_by_number(&number).await {
            Ok(Some(_)) => {
                return Err(BancaError::already_exists(format!(
                    "Card {} already exists in the local store",
                    number
                )));
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, card = %number, "Local store read failed during duplicate check")
            }
        }

        let created = self.remote_repository.create(&card).await?;

        if let Err(e) = self.local_repository.save(&created).await {
            self.log_mirror_failure(&number, "mirror", &e);
        }
        self.cache.insert(number.clone(), created.clone());

        info!("Card created: {}", number);
        Ok(CardResponse::from(created))
    }

    async fn update_card(
        &self,
        number: &CardNumber,
        request: UpdateCardRequest,
    ) -> BancaResult<CardResponse> {
        debug!("Updating card: {}", number);

        request.validate_request()?;
        let card = mappers::card_from_update(number, &request);

        let updated = self.remote_repository.update(number, &card).await?;

        if let Err(e) = self.local_repository.save(&updated).await {
            self.log_mirror_failure(number, "mirror", &e);
        }
        self.cache.insert(number.clone(), updated.clone());

        info!("Card updated: {}", number);
        Ok(CardResponse::from(updated))
    }

    async fn delete_card(&self, number: &CardNumber) -> BancaResult<()> {
        debug!("Deleting card: {}", number);

        self.remote_repository.delete(number).await?;

        if let Err(e) = self.local_repository.delete(number).await {
            self.log_mirror_failure(number, "delete", &e);
        }
        self.cache.remove(number);

        info!("Card deleted: {}", number);
        Ok(())
    }
}

impl std::fmt::Debug for CardServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardServiceImpl").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banca_core::BankCard;
    use chrono::NaiveDate;
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        pub LocalCards {}

        #[async_trait]
        impl BankCardRepository for LocalCards {
            async fn find_all(&self) -> BancaResult<Vec<BankCard>>;
            async fn find_by_number(&self, number: &CardNumber) -> BancaResult<Option<BankCard>>;
            async fn find_by_client_id(&self, client_id: ClientId) -> BancaResult<Vec<BankCard>>;
            async fn save(&self, card: &BankCard) -> BancaResult<BankCard>;
            async fn update(&self, number: &CardNumber, card: &BankCard) -> BancaResult<Option<BankCard>>;
            async fn delete(&self, number: &CardNumber) -> BancaResult<bool>;
        }
    }

    mock! {
        pub RemoteCards {}

        #[async_trait]
        impl RemoteBankCardRepository for RemoteCards {
            async fn get_all(&self) -> BancaResult<Vec<BankCard>>;
            async fn get_by_number(&self, number: &CardNumber) -> BancaResult<BankCard>;
            async fn create(&self, card: &BankCard) -> BancaResult<BankCard>;
            async fn update(&self, number: &CardNumber, card: &BankCard) -> BancaResult<BankCard>;
            async fn delete(&self, number: &CardNumber) -> BancaResult<()>;
        }
    }

    fn test_card(number: &str) -> BankCard {
        BankCard::new(
            CardNumber::from(number),
            Some(ClientId::from_raw(1)),
            NaiveDate::from_ymd_opt(2030, 6, 30).unwrap(),
        )
    }

    fn service(
        local: MockLocalCards,
        remote: MockRemoteCards,
    ) -> (CardServiceImpl, Arc<CardCache>) {
        let cache = Arc::new(CardCache::default());
        let service = CardServiceImpl::new(Arc::new(local), Arc::new(remote), cache.clone());
        (service, cache)
    }

    #[tokio::test]
    async fn test_read_through_and_idempotence() {
        let number = CardNumber::from("4539148803436467");
        let card = test_card(number.as_str());

        let mut local = MockLocalCards::new();
        local
            .expect_find_by_number()
            .with(eq(number.clone()))
            .times(1)
            .returning(|_| Ok(None));
        local.expect_save().times(1).returning(|c| Ok(c.clone()));

        let mut remote = MockRemoteCards::new();
        let remote_card = card.clone();
        remote
            .expect_get_by_number()
            .with(eq(number.clone()))
            .times(1)
            .returning(move |_| Ok(remote_card.clone()));

        let (service, cache) = service(local, remote);

        let first = service.find_card_by_number(&number).await.unwrap();
        // second read is served from the cache: expectations above allow
        // exactly one round-trip per store
        let second = service.find_card_by_number(&number).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_read_from_local_skips_remote() {
        let number = CardNumber::from("4539148803436467");
        let card = test_card(number.as_str());

        let mut local = MockLocalCards::new();
        let local_card = card.clone();
        local
            .expect_find_by_number()
            .times(1)
            .returning(move |_| Ok(Some(local_card.clone())));

        let mut remote = MockRemoteCards::new();
        remote.expect_get_by_number().times(0);

        let (service, cache) = service(local, remote);
        let found = service.find_card_by_number(&number).await.unwrap();
        assert_eq!(found.number, number.as_str());
        assert!(cache.get(&number).is_some());
    }

    #[tokio::test]
    async fn test_read_local_failure_falls_through_to_remote() {
        let number = CardNumber::from("4539148803436467");
        let card = test_card(number.as_str());

        let mut local = MockLocalCards::new();
        local
            .expect_find_by_number()
            .times(1)
            .returning(|_| Err(BancaError::Database("local store is broken".to_string())));
        local.expect_save().times(1).returning(|c| Ok(c.clone()));

        let mut remote = MockRemoteCards::new();
        let remote_card = card.clone();
        remote
            .expect_get_by_number()
            .times(1)
            .returning(move |_| Ok(remote_card.clone()));

        let (service, _cache) = service(local, remote);
        let found = service.find_card_by_number(&number).await.unwrap();
        assert_eq!(found.number, number.as_str());
    }

    #[tokio::test]
    async fn test_read_not_found() {
        let number = CardNumber::from("4539148803436467");

        let mut local = MockLocalCards::new();
        local.expect_find_by_number().returning(|_| Ok(None));

        let mut remote = MockRemoteCards::new();
        remote
            .expect_get_by_number()
            .returning(|n| Err(BancaError::not_found("BankCard", n.as_str())));

        let (service, _cache) = service(local, remote);
        let err = service.find_card_by_number(&number).await.unwrap_err();
        assert!(matches!(err, BancaError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_save_writes_remote_first_then_mirrors() {
        let mut local = MockLocalCards::new();
        local.expect_find_by_number().times(1).returning(|_| Ok(None));
        local.expect_save().times(1).returning(|c| Ok(c.clone()));

        let mut remote = MockRemoteCards::new();
        remote.expect_create().times(1).returning(|c| Ok(c.clone()));

        let (service, cache) = service(local, remote);
        let request = CreateCardRequest {
            number: "4539148803436467".to_string(),
            client_id: Some(1),
            expiration_date: NaiveDate::from_ymd_opt(2030, 6, 30).unwrap(),
        };

        let created = service.save_card(request).await.unwrap();
        assert_eq!(created.number, "4539148803436467");
        assert!(cache.get(&CardNumber::from("4539148803436467")).is_some());
    }

    #[tokio::test]
    async fn test_save_duplicate_in_cache_rejected_without_remote_call() {
        let local = MockLocalCards::new();
        let mut remote = MockRemoteCards::new();
        remote.expect_create().times(0);

        let (service, cache) = service(local, remote);
        cache.insert(
            CardNumber::from("4539148803436467"),
            test_card("4539148803436467"),
        );

        let request = CreateCardRequest {
            number: "4539148803436467".to_string(),
            client_id: Some(1),
            expiration_date: NaiveDate::from_ymd_opt(2030, 6, 30).unwrap(),
        };
        let err = service.save_card(request).await.unwrap_err();
        assert!(matches!(err, BancaError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_save_remote_rejection_leaves_cache_empty() {
        let mut local = MockLocalCards::new();
        local.expect_find_by_number().returning(|_| Ok(None));
        local.expect_save().times(0);

        let mut remote = MockRemoteCards::new();
        remote
            .expect_create()
            .returning(|_| Err(BancaError::remote_write_failed("card already registered")));

        let (service, cache) = service(local, remote);
        let request = CreateCardRequest {
            number: "4539148803436467".to_string(),
            client_id: Some(1),
            expiration_date: NaiveDate::from_ymd_opt(2030, 6, 30).unwrap(),
        };
        let err = service.save_card(request).await.unwrap_err();
        assert!(matches!(err, BancaError::RemoteWriteFailed(_)));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_save_invalid_number_rejected() {
        let (service, _cache) = service(MockLocalCards::new(), MockRemoteCards::new());
        let request = CreateCardRequest {
            number: "1234".to_string(),
            client_id: None,
            expiration_date: NaiveDate::from_ymd_opt(2030, 6, 30).unwrap(),
        };
        let err = service.save_card(request).await.unwrap_err();
        assert!(matches!(err, BancaError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_overwrites_cache() {
        let number = CardNumber::from("4539148803436467");

        let mut local = MockLocalCards::new();
        local.expect_save().times(1).returning(|c| Ok(c.clone()));

        let mut remote = MockRemoteCards::new();
        remote
            .expect_update()
            .times(1)
            .returning(|_, c| Ok(c.clone()));

        let (service, cache) = service(local, remote);
        cache.insert(number.clone(), test_card(number.as_str()));

        let request = UpdateCardRequest {
            client_id: Some(2),
            expiration_date: NaiveDate::from_ymd_opt(2031, 1, 31).unwrap(),
        };
        let updated = service.update_card(&number, request).await.unwrap();
        assert_eq!(updated.client_id, Some(2));

        let cached = cache.get(&number).unwrap();
        assert_eq!(cached.client_id, Some(ClientId::from_raw(2)));
    }

    #[tokio::test]
    async fn test_delete_removes_all_tiers() {
        let number = CardNumber::from("4539148803436467");

        let mut local = MockLocalCards::new();
        local.expect_delete().times(1).returning(|_| Ok(true));

        let mut remote = MockRemoteCards::new();
        remote.expect_delete().times(1).returning(|_| Ok(()));

        let (service, cache) = service(local, remote);
        cache.insert(number.clone(), test_card(number.as_str()));

        service.delete_card(&number).await.unwrap();
        assert!(cache.get(&number).is_none());
    }

    #[tokio::test]
    async fn test_delete_not_found_skips_other_tiers() {
        let number = CardNumber::from("4539148803436467");

        let mut local = MockLocalCards::new();
        local.expect_delete().times(0);

        let mut remote = MockRemoteCards::new();
        remote
            .expect_delete()
            .returning(|n| Err(BancaError::not_found("BankCard", n.as_str())));

        let (service, cache) = service(local, remote);
        cache.insert(number.clone(), test_card(number.as_str()));

        let err = service.delete_card(&number).await.unwrap_err();
        assert!(matches!(err, BancaError::NotFound { .. }));
        // the cached copy survives an aborted delete
        assert!(cache.get(&number).is_some());
    }

    #[tokio::test]
    async fn test_find_cards_by_client_id_prefers_local() {
        let mut local = MockLocalCards::new();
        local
            .expect_find_by_client_id()
            .with(eq(ClientId::from_raw(1)))
            .times(1)
            .returning(|_| Ok(vec![test_card("1111222233334444")]));

        let mut remote = MockRemoteCards::new();
        remote.expect_get_all().times(0);

        let (service, _cache) = service(local, remote);
        let cards = service
            .find_cards_by_client_id(ClientId::from_raw(1))
            .await
            .unwrap();
        assert_eq!(cards.len(), 1);
    }

    #[tokio::test]
    async fn test_find_cards_by_client_id_falls_back_to_remote() {
        let mut local = MockLocalCards::new();
        local
            .expect_find_by_client_id()
            .returning(|_| Err(BancaError::Database("local store is broken".to_string())));

        let mut remote = MockRemoteCards::new();
        remote.expect_get_all().times(1).returning(|| {
            Ok(vec![
                test_card("1111222233334444"),
                BankCard::new(
                    CardNumber::from("5555666677778888"),
                    Some(ClientId::from_raw(2)),
                    NaiveDate::from_ymd_opt(2030, 6, 30).unwrap(),
                ),
            ])
        });

        let (service, _cache) = service(local, remote);
        let cards = service
            .find_cards_by_client_id(ClientId::from_raw(1))
            .await
            .unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].client_id, Some(1));
    }
}
