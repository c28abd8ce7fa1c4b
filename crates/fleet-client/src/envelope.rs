//! `{ success, message, data }` response wrapper

use serde::Deserialize;

use crate::error::ClientError;

/// Body shape of the wrapped endpoints. Other endpoints return the payload
/// directly, so callers pick per endpoint.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn into_data(self) -> Result<T, ClientError> {
        if !self.success {
            return Err(ClientError::Unsuccessful(
                self.message.unwrap_or_else(|| "request failed".to_string()),
            ));
        }
        self.data.ok_or(ClientError::MissingData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_data() {
        let ok: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success":true,"message":"ok","data":[1,2]}"#).unwrap();
        assert_eq!(ok.into_data().unwrap(), vec![1, 2]);

        let failed: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success":false,"message":"Plate already registered"}"#)
                .unwrap();
        match failed.into_data() {
            Err(ClientError::Unsuccessful(message)) => assert_eq!(message, "Plate already registered"),
            other => panic!("unexpected: {:?}", other),
        }

        let empty: ApiEnvelope<u32> = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(matches!(empty.into_data(), Err(ClientError::MissingData)));
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Driver {
        name: String,
    }

    fn unwrap_payload<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, ClientError> {
        serde_json::from_str::<ApiEnvelope<T>>(raw).unwrap().into_data()
    }

    #[test]
    fn test_payload_without_default_impl() {
        let driver: Driver = unwrap_payload(r#"{"success":true,"data":{"name":"Ayu"}}"#).unwrap();
        assert_eq!(driver, Driver { name: "Ayu".into() });
    }
}
