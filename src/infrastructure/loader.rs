//! Runs catalog fetches off the UI thread.
//!
//! Each request carries the ticket of the catalog view that asked for it,
//! and the response echoes that ticket back so the view can tell whether the
//! answer still belongs to what is on screen.

use super::storefront::CatalogClient;
use crate::domain::{DomainError, DomainResult, Product};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogRequest {
    pub ticket: u64,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogResponse {
    pub ticket: u64,
    pub result: DomainResult<Vec<Product>>,
}

pub struct CatalogLoader {
    client: Arc<dyn CatalogClient>,
    sender: Sender<CatalogResponse>,
    receiver: Receiver<CatalogResponse>,
}

impl CatalogLoader {
    pub fn new(client: Arc<dyn CatalogClient>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            client,
            sender,
            receiver,
        }
    }

    /// Starts a fetch in the background. The response shows up in
    /// [`CatalogLoader::try_next`].
    pub fn dispatch(&self, request: CatalogRequest) {
        let client = Arc::clone(&self.client);
        let sender = self.sender.clone();
        debug!(ticket = request.ticket, limit = request.limit, "dispatching catalog fetch");

        let spawned = thread::Builder::new()
            .name(format!("catalog-fetch-{}", request.ticket))
            .spawn(move || {
                let result = client.fetch_products(request.limit);
                // The receiver only goes away when the app is shutting down.
                let _ = sender.send(CatalogResponse {
                    ticket: request.ticket,
                    result,
                });
            });

        if let Err(e) = spawned {
            error!(error = %e, "could not start catalog fetch");
            let _ = self.sender.send(CatalogResponse {
                ticket: request.ticket,
                result: Err(DomainError::UpstreamUnavailable(e.to_string())),
            });
        }
    }

    pub fn try_next(&self) -> Option<CatalogResponse> {
        self.receiver.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    struct FixedCatalog {
        calls: Mutex<Vec<usize>>,
    }

    impl CatalogClient for FixedCatalog {
        fn fetch_products(&self, limit: usize) -> DomainResult<Vec<Product>> {
            self.calls.lock().unwrap().push(limit);
            if limit == 0 {
                Err(DomainError::UpstreamUnavailable("offline".to_string()))
            } else {
                Ok(Vec::new())
            }
        }
    }

    fn wait_for(loader: &CatalogLoader) -> CatalogResponse {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(response) = loader.try_next() {
                return response;
            }
            assert!(Instant::now() < deadline, "no catalog response");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_response_echoes_ticket() {
        let client = Arc::new(FixedCatalog {
            calls: Mutex::new(Vec::new()),
        });
        let loader = CatalogLoader::new(client.clone());

        loader.dispatch(CatalogRequest { ticket: 7, limit: 20 });
        let response = wait_for(&loader);

        assert_eq!(response.ticket, 7);
        assert_eq!(response.result, Ok(Vec::new()));
        assert_eq!(*client.calls.lock().unwrap(), vec![20]);
    }

    #[test]
    fn test_failures_are_delivered() {
        let loader = CatalogLoader::new(Arc::new(FixedCatalog {
            calls: Mutex::new(Vec::new()),
        }));

        loader.dispatch(CatalogRequest { ticket: 1, limit: 0 });
        let response = wait_for(&loader);

        assert!(matches!(response.result, Err(DomainError::UpstreamUnavailable(_))));
        assert!(loader.try_next().is_none());
    }
}
