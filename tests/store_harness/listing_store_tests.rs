//! Macro-generated test suite for `ListingStore` contract validation.
//!
//! Generates a test module that validates any `ListingStore` implementation
//! against the contract the adapter relies on: CRUD semantics, `NotFound`
//! behavior, overwrite-on-insert, and concurrent access.
//!
//! `$factory` must be an expression evaluating to a fresh store; it is
//! re-evaluated per test for isolation. The concurrent test additionally
//! needs the store to be `Clone + 'static`.

/// Generate a full `ListingStore` conformance test suite.
#[macro_export]
macro_rules! listing_store_tests {
    ($factory:expr) => {
        mod listing_store_contract_tests {
            use super::*;
            use bookswap::prelude::*;

            // ==================================================================
            // Insert & get
            // ==================================================================

            #[tokio::test]
            async fn test_insert_and_get() {
                let store = $factory;
                let listing = sample_listing("Dune");

                store.insert(listing.clone()).await.unwrap();

                let retrieved = store.get(&listing.id).await.unwrap();
                assert_eq!(retrieved, Some(listing));
            }

            #[tokio::test]
            async fn test_get_nonexistent_is_none() {
                let store = $factory;
                let result = store.get(&Uuid::new_v4()).await.unwrap();
                assert!(result.is_none());
            }

            #[tokio::test]
            async fn test_insert_same_id_overwrites() {
                let store = $factory;
                let mut listing = sample_listing("Dune");
                store.insert(listing.clone()).await.unwrap();

                listing.price = 99.0;
                store.insert(listing.clone()).await.unwrap();

                let all = store.list().await.unwrap();
                assert_eq!(all.len(), 1);
                assert_eq!(all[0].price, 99.0);
            }

            // ==================================================================
            // List
            // ==================================================================

            #[tokio::test]
            async fn test_list_empty() {
                let store = $factory;
                assert!(store.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_list_returns_every_record() {
                let store = $factory;
                for title in ["Dune", "Emma", "Hamlet"] {
                    store.insert(sample_listing(title)).await.unwrap();
                }

                let all = store.list().await.unwrap();
                assert_eq!(all.len(), 3);
            }

            // ==================================================================
            // Replace
            // ==================================================================

            #[tokio::test]
            async fn test_replace_persists_new_fields() {
                let store = $factory;
                let listing = sample_listing("Dune");
                store.insert(listing.clone()).await.unwrap();

                let mut updated = listing.clone();
                updated.title = "Dune Messiah".to_string();
                store.replace(&listing.id, updated.clone()).await.unwrap();

                let retrieved = store.get(&listing.id).await.unwrap().unwrap();
                assert_eq!(retrieved.title, "Dune Messiah");
            }

            #[tokio::test]
            async fn test_replace_nonexistent_is_not_found() {
                let store = $factory;
                let listing = sample_listing("Dune");

                let err = store.replace(&listing.id, listing.clone()).await.unwrap_err();
                assert_eq!(err.error_code(), "NOT_FOUND");
            }

            // ==================================================================
            // Remove
            // ==================================================================

            #[tokio::test]
            async fn test_remove_then_get_is_none() {
                let store = $factory;
                let listing = sample_listing("Dune");
                store.insert(listing.clone()).await.unwrap();

                store.remove(&listing.id).await.unwrap();

                assert!(store.get(&listing.id).await.unwrap().is_none());
                assert!(store.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_remove_nonexistent_is_not_found() {
                let store = $factory;
                let err = store.remove(&Uuid::new_v4()).await.unwrap_err();
                assert_eq!(err.error_code(), "NOT_FOUND");
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_inserts() {
                let store = $factory;

                let mut handles = Vec::new();
                for i in 0..8 {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move {
                        store.insert(sample_listing(&format!("Book {i}"))).await
                    }));
                }
                for handle in handles {
                    handle.await.unwrap().unwrap();
                }

                assert_eq!(store.list().await.unwrap().len(), 8);
            }
        }
    };
}
