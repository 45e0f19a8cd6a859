//! Batch hashing integration tests.

#[cfg(test)]
mod tests {
    use hashbatch_model::HashResponse;

    use crate::{batch_json, client, post_raw};

    const FOOBAR: &str = "w6uP8Tcg6K2QR905Rms8iXTlksL6OD1KOWBxTK7wxPI=";

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_hash_round_trip_example() {
        let client = client();
        let (status, body) = post_raw(&client, r#"[{"str_a":"foo","str_b":"bar"}]"#)
            .await
            .unwrap();

        assert_eq!(status, reqwest::StatusCode::OK);
        let response: HashResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response.hashes, vec![FOOBAR.to_owned()]);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_accept_legacy_key() {
        let client = client();
        let (status, body) = post_raw(&client, r#"[{"srt_a":"foo","str_b":"bar"}]"#)
            .await
            .unwrap();

        assert_eq!(status, reqwest::StatusCode::OK);
        let response: HashResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response.hashes, vec![FOOBAR.to_owned()]);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_empty_hashes_for_empty_batch() {
        let client = client();
        let (status, body) = post_raw(&client, "[]").await.unwrap();

        assert_eq!(status, reqwest::StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "hashes": [] }));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_hash_concatenation_ambiguously() {
        let client = client();
        let (_, body) = post_raw(
            &client,
            r#"[{"str_a":"ab","str_b":"c"},{"str_a":"a","str_b":"bc"}]"#,
        )
        .await
        .unwrap();

        let response: HashResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response.hashes.len(), 2);
        assert_eq!(response.hashes[0], response.hashes[1]);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_hash_large_batch_in_order() {
        let client = client();
        let items: Vec<(String, String)> = (0..10_000)
            .map(|i| (format!("item-{i}"), String::new()))
            .collect();
        let (status, body) = post_raw(&client, batch_json(&items)).await.unwrap();

        assert_eq!(status, reqwest::StatusCode::OK);
        let response: HashResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response.hashes.len(), 10_000);

        // Every item is distinct, so no two positions may collide.
        let unique: std::collections::HashSet<_> = response.hashes.iter().collect();
        assert_eq!(unique.len(), 10_000);

        // A single-item request must agree with the batched position.
        let single = vec![items[4_242].clone()];
        let (_, body) = post_raw(&client, batch_json(&single)).await.unwrap();
        let single: HashResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(single.hashes[0], response.hashes[4_242]);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_serve_concurrent_requests() {
        let client = client();
        let requests = (0..64).map(|i| {
            let client = client.clone();
            async move {
                let items = vec![(format!("req-{i}"), "x".to_owned())];
                let (status, body) = post_raw(&client, batch_json(&items)).await.unwrap();
                assert_eq!(status, reqwest::StatusCode::OK);
                let response: HashResponse = serde_json::from_slice(&body).unwrap();
                (i, response.hashes)
            }
        });
        let results = futures::future::join_all(requests).await;

        let unique: std::collections::HashSet<_> =
            results.iter().map(|(_, hashes)| hashes[0].clone()).collect();
        assert_eq!(unique.len(), 64);
    }
}
