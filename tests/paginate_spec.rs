use std::cell::{Cell, RefCell};

use aha_mcp::client::ClientError;
use aha_mcp::paginate::{paginate, paginate_with_limit, Batch};
use serde_json::json;
use speculate2::speculate;
use tokio_test::block_on;

fn batch(items: Vec<u32>, total_pages: Option<u32>) -> Batch<u32> {
    Batch { items, total_pages }
}

speculate! {
    describe "paginate" {
        before {
            let calls = Cell::new(0u32);
            let pages_seen = RefCell::new(Vec::<u32>::new());
        }

        it "fetches every declared page in order" {
            let items = block_on(paginate(|page| {
                calls.set(calls.get() + 1);
                pages_seen.borrow_mut().push(page);
                async move { Ok(batch(vec![page], Some(3))) }
            }))
            .expect("pagination failed");

            assert_eq!(items, vec![1, 2, 3]);
            assert_eq!(calls.get(), 3);
            assert_eq!(*pages_seen.borrow(), vec![1, 2, 3]);
        }

        it "stops after one fetch when the total is one" {
            let items = block_on(paginate(|page| {
                calls.set(calls.get() + 1);
                async move { Ok(batch(vec![page, page], Some(1))) }
            }))
            .expect("pagination failed");

            assert_eq!(items.len(), 2);
            assert_eq!(calls.get(), 1);
        }

        it "treats a missing or zero total as a single page" {
            block_on(paginate(|_| {
                calls.set(calls.get() + 1);
                async { Ok(batch(vec![], None)) }
            }))
            .expect("pagination failed");
            assert_eq!(calls.get(), 1);

            block_on(paginate(|_| {
                calls.set(calls.get() + 1);
                async { Ok(batch(vec![], Some(0))) }
            }))
            .expect("pagination failed");
            assert_eq!(calls.get(), 2);
        }

        it "reads the total fresh from each page" {
            let items = block_on(paginate(|page| {
                calls.set(calls.get() + 1);
                let total = if page == 1 { 2 } else { 4 };
                async move { Ok(batch(vec![page], Some(total))) }
            }))
            .expect("pagination failed");

            assert_eq!(items, vec![1, 2, 3, 4]);
        }

        it "discards accumulated items when a page fails" {
            let result = block_on(paginate(|page| {
                calls.set(calls.get() + 1);
                async move {
                    if page == 2 {
                        Err(ClientError::Server("503 Service Unavailable: ".into()))
                    } else {
                        Ok(batch(vec![page], Some(3)))
                    }
                }
            }));

            assert!(matches!(result, Err(ClientError::Server(_))));
            assert_eq!(calls.get(), 2);
        }

        it "gives up past the page limit" {
            let result = block_on(paginate_with_limit(5, |page| {
                calls.set(calls.get() + 1);
                async move { Ok(batch(vec![page], Some(page + 1))) }
            }));

            assert!(matches!(result, Err(ClientError::PageLimit(5))));
            assert_eq!(calls.get(), 5);
        }
    }

    describe "Batch::from_envelope" {
        it "reads items and total pages" {
            let batch: Batch<u32> = Batch::from_envelope(
                json!({ "releases": [1, 2], "pagination": { "total_pages": 7, "current_page": 1 } }),
                "releases",
            )
            .expect("decode");

            assert_eq!(batch.items, vec![1, 2]);
            assert_eq!(batch.total_pages, Some(7));
        }

        it "tolerates a missing pagination block" {
            let batch: Batch<u32> = Batch::from_envelope(json!({ "releases": [] }), "releases").expect("decode");
            assert_eq!(batch.total_pages, None);
        }

        it "fails when the collection key is absent" {
            let result: Result<Batch<u32>, _> = Batch::from_envelope(json!({ "features": [] }), "releases");
            assert!(matches!(result, Err(ClientError::Decode(_))));
        }
    }
}
