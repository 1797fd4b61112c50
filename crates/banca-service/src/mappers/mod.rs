//! Mapping between DTOs and domain entities.

use crate::dto::{CreateCardRequest, CreateClientRequest, UpdateCardRequest, UpdateClientRequest};
use banca_core::{
    BancaError, BancaResult, BankCard, CardNumber, Client, ClientId, Email,
};

/// Builds a domain client from a create request. The optional id is carried
/// over; email format is re-validated as the value object is constructed.
pub fn client_from_create(request: &CreateClientRequest) -> BancaResult<Client> {
    let email =
        Email::new(&request.email).map_err(|e| BancaError::Validation(e.to_string()))?;
    let mut client = Client::new(request.name.clone(), request.username.clone(), email);
    if let Some(id) = request.id {
        client.assign_id(ClientId::from_raw(id));
    }
    Ok(client)
}

/// Builds a domain client from an update request. The caller attaches the
/// id of the client being updated.
pub fn client_from_update(request: &UpdateClientRequest) -> BancaResult<Client> {
    let email =
        Email::new(&request.email).map_err(|e| BancaError::Validation(e.to_string()))?;
    Ok(Client::new(
        request.name.clone(),
        request.username.clone(),
        email,
    ))
}

/// Builds a domain card from a create request.
#[must_use]
pub fn card_from_create(request: &CreateCardRequest) -> BankCard {
    BankCard::new(
        CardNumber::from(request.number.as_str()),
        request.client_id.map(ClientId::from_raw),
        request.expiration_date,
    )
}

/// Builds a domain card from an update request against an existing number.
#[must_use]
pub fn card_from_update(number: &CardNumber, request: &UpdateCardRequest) -> BankCard {
    BankCard::new(
        number.clone(),
        request.client_id.map(ClientId::from_raw),
        request.expiration_date,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_client_from_create_with_id() {
        let request = CreateClientRequest {
            id: Some(7),
            name: "Jane".to_string(),
            username: "janedoe".to_string(),
            email: "jane@example.com".to_string(),
        };
        let client = client_from_create(&request).unwrap();
        assert_eq!(client.id, Some(ClientId::from_raw(7)));
        assert_eq!(client.email.as_str(), "jane@example.com");
    }

    #[test]
    fn test_client_from_create_without_id() {
        let request = CreateClientRequest {
            id: None,
            name: "Jane".to_string(),
            username: "janedoe".to_string(),
            email: "jane@example.com".to_string(),
        };
        let client = client_from_create(&request).unwrap();
        assert!(client.id.is_none());
    }

    #[test]
    fn test_client_from_create_rejects_bad_email() {
        let request = CreateClientRequest {
            id: None,
            name: "Jane".to_string(),
            username: "janedoe".to_string(),
            email: "nope".to_string(),
        };
        assert!(client_from_create(&request).is_err());
    }

    #[test]
    fn test_card_from_update_keeps_number() {
        let number = CardNumber::from("4539148803436467");
        let request = UpdateCardRequest {
            client_id: Some(2),
            expiration_date: NaiveDate::from_ymd_opt(2031, 1, 31).unwrap(),
        };
        let card = card_from_update(&number, &request);
        assert_eq!(card.number, number);
        assert_eq!(card.client_id, Some(ClientId::from_raw(2)));
    }
}
