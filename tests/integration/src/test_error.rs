//! Failure handling integration tests.

#[cfg(test)]
mod tests {
    use crate::{client, endpoint_url, hash_url, post_raw};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_empty_500_for_bare_string() {
        let client = client();
        let (status, body) = post_raw(&client, r#""just a string""#).await.unwrap();

        assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_empty_500_for_truncated_json() {
        let client = client();
        let (status, body) = post_raw(&client, r#"[{"str_a":"foo""#).await.unwrap();

        assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_recover_after_failed_request() {
        let client = client();
        let (status, _) = post_raw(&client, "{").await.unwrap();
        assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);

        let (status, body) = post_raw(&client, r#"[{"str_a":"a","str_b":"b"}]"#)
            .await
            .unwrap();
        assert_eq!(status, reqwest::StatusCode::OK);
        assert!(!body.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_get_on_hash_endpoint() {
        let client = client();
        let resp = client.get(hash_url()).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_not_found_for_unknown_path() {
        let client = client();
        let resp = client
            .post(format!("{}/nope", endpoint_url()))
            .body("[]")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
