use crate::core::{
    errors::SerumError,
    kernel::{Transport, TxSigner},
    types::PostSubmitRequest,
};
use crate::serum::operations::PostSubmit;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Transaction returned by a build call, not yet signed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction(String);

/// Transaction carrying the local signature, ready to submit
///
/// Only obtainable by signing an [`UnsignedTransaction`], which consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction(String);

impl UnsignedTransaction {
    pub fn new(base64: impl Into<String>) -> Self {
        Self(base64.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn sign(self, signer: &dyn TxSigner) -> Result<SignedTransaction, SerumError> {
        signer.sign_transaction(&self.0).map(SignedTransaction)
    }
}

impl From<String> for UnsignedTransaction {
    fn from(base64: String) -> Self {
        Self(base64)
    }
}

impl SignedTransaction {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Result of a sequential batch submission
///
/// `completed` holds the signatures of every transaction submitted before
/// the first failure, in submission order. Nothing after the failure was
/// attempted and nothing before it is rolled back.
#[derive(Debug)]
pub struct BatchOutcome {
    pub completed: Vec<String>,
    pub error: Option<SerumError>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// All signatures, or [`SerumError::PartialBatch`] with those submitted so far
    pub fn into_result(self) -> Result<Vec<String>, SerumError> {
        match self.error {
            None => Ok(self.completed),
            Some(source) => Err(SerumError::PartialBatch {
                completed: self.completed,
                source: Box::new(source),
            }),
        }
    }
}

/// Sign-and-submit orchestration over any transport
pub struct Submitter<T: Transport> {
    transport: Arc<T>,
    signer: Option<Arc<dyn TxSigner>>,
}

impl<T: Transport> Submitter<T> {
    pub fn new(transport: &Arc<T>, signer: Option<Arc<dyn TxSigner>>) -> Self {
        Self {
            transport: Arc::clone(transport),
            signer,
        }
    }

    pub fn has_signer(&self) -> bool {
        self.signer.is_some()
    }

    /// The configured signer, checked before any network call
    pub fn signer(&self) -> Result<&Arc<dyn TxSigner>, SerumError> {
        self.signer.as_ref().ok_or(SerumError::PrivateKeyNotFound)
    }

    /// Sign one transaction and submit it, returning the network signature
    #[instrument(skip(self, transaction), fields(transport = %self.transport.kind()))]
    pub async fn submit_one(
        &self,
        transaction: UnsignedTransaction,
        skip_pre_flight: bool,
    ) -> Result<String, SerumError> {
        let signer = self.signer()?;
        let signed = transaction.sign(signer.as_ref())?;
        debug!("Transaction signed");

        let response = self
            .transport
            .unary::<PostSubmit>(PostSubmitRequest {
                transaction: signed.into_inner(),
                skip_pre_flight,
            })
            .await?;

        debug!(signature = %response.signature, "Transaction submitted");
        Ok(response.signature)
    }

    /// Sign and submit transactions strictly in order, stopping at the first failure
    #[instrument(skip(self, transactions), fields(transport = %self.transport.kind(), count = transactions.len()))]
    pub async fn submit_many(
        &self,
        transactions: Vec<UnsignedTransaction>,
        skip_pre_flight: bool,
    ) -> BatchOutcome {
        let mut completed = Vec::with_capacity(transactions.len());

        if let Err(error) = self.signer() {
            return BatchOutcome {
                completed,
                error: Some(error),
            };
        }

        for (index, transaction) in transactions.into_iter().enumerate() {
            match self.submit_one(transaction, skip_pre_flight).await {
                Ok(signature) => completed.push(signature),
                Err(error) => {
                    warn!(index, submitted = completed.len(), "Batch stopped: {}", error);
                    return BatchOutcome {
                        completed,
                        error: Some(error),
                    };
                }
            }
        }

        BatchOutcome {
            completed,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RejectingSigner;

    impl TxSigner for RejectingSigner {
        fn public_key(&self) -> String {
            "11111111111111111111111111111111".to_string()
        }

        fn sign_transaction(&self, unsigned: &str) -> Result<String, SerumError> {
            if unsigned == "good" {
                Ok("signed".to_string())
            } else {
                Err(SerumError::Signing("bad transaction".to_string()))
            }
        }
    }

    #[test]
    fn test_signing_consumes_unsigned() {
        let signed = UnsignedTransaction::new("good")
            .sign(&RejectingSigner)
            .unwrap();
        assert_eq!(signed.as_str(), "signed");

        let err = UnsignedTransaction::new("bad")
            .sign(&RejectingSigner)
            .unwrap_err();
        assert!(matches!(err, SerumError::Signing(_)));
    }

    #[test]
    fn test_outcome_into_result() {
        let outcome = BatchOutcome {
            completed: vec!["a".to_string(), "b".to_string()],
            error: None,
        };
        assert!(outcome.is_complete());
        assert_eq!(outcome.into_result().unwrap(), vec!["a", "b"]);

        let outcome = BatchOutcome {
            completed: vec!["a".to_string()],
            error: Some(SerumError::Timeout(std::time::Duration::from_secs(7))),
        };
        match outcome.into_result().unwrap_err() {
            SerumError::PartialBatch { completed, source } => {
                assert_eq!(completed, vec!["a"]);
                assert!(matches!(*source, SerumError::Timeout(_)));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
