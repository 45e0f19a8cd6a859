//! Health endpoint integration tests.

#[cfg(test)]
mod tests {
    use hashbatch_model::HealthReport;

    use crate::{client, endpoint_url, post_raw};

    async fn health(client: &reqwest::Client) -> HealthReport {
        client
            .get(format!("{}/health", endpoint_url()))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_running() {
        let client = client();
        let report = health(&client).await;
        assert_eq!(report.status, "running");
        assert!(report.buffers.capacity >= 1);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_keep_pools_bounded() {
        let client = client();
        for _ in 0..20 {
            post_raw(&client, r#"[{"str_a":"x","str_b":"y"}]"#)
                .await
                .unwrap();
        }

        let report = health(&client).await;
        assert!(report.buffers.idle <= report.buffers.capacity);
        assert!(report.batches.idle <= report.batches.capacity);
        assert!(report.buffers.hits + report.buffers.misses >= 20);
    }
}
