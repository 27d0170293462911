// Copyright 2025 The Kappital Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use reqwest::Method;
    use wiremock::matchers::{body_bytes, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use kappital_kube::domain::model::{decode_instances, decode_services};
    use kappital_kube::infrastructure::constants::*;
    use kappital_kube::infrastructure::http::{execute, RequestBody, RequestInfo, TlsMaterial};
    use kappital_kube::infrastructure::url::render_url;
    use kappital_kube::{KappError, ManagerConfig};

    #[tokio::test]
    async fn test_get_services_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1alpha1/servicebinding"))
            .and(query_param("cluster_name", "prod-1"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"[{"name":"svc-a","namespace":"default","phase":"Succeeded"},
                    {"name":"svc-b","namespace":"default","phase":"Pending"}]"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let url = render_url(GET_SERVICES_URL, &[&server.uri(), "prod-1"]);
        let info = RequestInfo::new(Method::GET, url, TlsMaterial::default());
        let (status, body) = execute(&info).await.unwrap();
        assert_eq!(status, 200);

        let services = decode_services(&body).unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].name, "svc-a");
        assert_eq!(services[1].phase, "Pending");
    }

    #[tokio::test]
    async fn test_get_single_service_appends_detail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1alpha1/servicebinding/foo"))
            .and(query_param("cluster_name", "default"))
            .and(query_param("detail", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"name":"foo","namespace":"default","phase":"Succeeded"}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!(
            "{}{}",
            render_url(GET_SERVICE_URL, &[&server.uri(), "/foo", "default"]),
            DETAIL_QUERY
        );
        let info = RequestInfo::new(Method::GET, url, TlsMaterial::default());
        let (status, body) = execute(&info).await.unwrap();
        assert_eq!(status, 200);
        assert_eq!(decode_services(&body).unwrap()[0].name, "foo");
    }

    #[tokio::test]
    async fn test_delete_error_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1alpha1/servicebinding/svc-1/instance/inst-1"))
            .and(query_param("cluster_name", "prod-1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let url = render_url(
            DELETE_INSTANCE_URL,
            &[&server.uri(), "svc-1", "inst-1", "prod-1"],
        );
        let info = RequestInfo::new(Method::DELETE, url, TlsMaterial::default());
        let (status, body) = execute(&info).await.unwrap();
        assert_eq!(status, 500);

        let err = KappError::status(
            "delete service instance",
            "inst-1",
            status,
            String::from_utf8_lossy(&body),
        );
        assert_eq!(
            err.to_string(),
            "delete service instance inst-1 failed, statusCode: 500, detail: boom"
        );
    }

    #[tokio::test]
    async fn test_post_binary_body_sent_verbatim() {
        let server = MockServer::start().await;
        let package = vec![0x1f, 0x8b, 0x08, 0x00, 0x42];
        Mock::given(method("POST"))
            .and(path("/api/v1alpha1/servicebinding"))
            .and(body_bytes(package.clone()))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let url = render_url(DEPLOY_SERVICE_URL, &[&server.uri()]);
        let info = RequestInfo::new(Method::POST, url, TlsMaterial::default())
            .with_body(RequestBody::File(package));
        let (status, _) = execute(&info).await.unwrap();
        assert_eq!(status, 200);
    }

    #[tokio::test]
    async fn test_json_body_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1alpha1/servicebinding"))
            .and(header("content-type", "application/json"))
            .and(header("x-added", "1"))
            .and(header("x-set", "final"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let url = render_url(DEPLOY_SERVICE_URL, &[&server.uri()]);
        let mut info = RequestInfo::new(Method::POST, url, TlsMaterial::default())
            .with_body(RequestBody::Json(serde_json::json!({"name": "demo"})));
        info.header_add.push(("x-added".into(), "1".into()));
        info.header_set.push(("x-set".into(), "final".into()));
        let (status, _) = execute(&info).await.unwrap();
        assert_eq!(status, 200);
    }

    #[tokio::test]
    async fn test_bad_cert_material_fails_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        // An https URL with CA material engages the mutual-TLS client; the
        // undecodable client certificate must surface before the request.
        let tls = TlsMaterial {
            ca_data: BASE64.encode("ca"),
            cert_data: "!!!not base64!!!".to_string(),
            key_data: BASE64.encode("key"),
            skip_verify: false,
        };
        let info = RequestInfo::new(Method::GET, "https://127.0.0.1:1/api", tls);
        let err = execute(&info).await.unwrap_err();
        assert!(err.to_string().contains("manager-client-certificate-data"));
    }

    #[tokio::test]
    async fn test_instances_preserve_server_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1alpha1/servicebinding/svc-1/instance"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"[{"name":"i2","status":"Running"},{"name":"i1","status":"Running"}]"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let url = render_url(GET_INSTANCES_URL, &[&server.uri(), "svc-1"]);
        let info = RequestInfo::new(Method::GET, url, TlsMaterial::default());
        let (_, body) = execute(&info).await.unwrap();
        let instances = decode_instances(&body).unwrap();
        let names: Vec<&str> = instances.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["i2", "i1"]);
    }

    #[test]
    fn test_config_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".kappital").join("config");
        let cfg = ManagerConfig {
            server: "https://10.0.0.1:443".to_string(),
            client_cert_data: BASE64.encode("cert pem"),
            client_key_data: BASE64.encode("key pem"),
            ca_data: BASE64.encode("ca pem"),
            skip_verify: true,
        };
        cfg.save_to(&path).unwrap();
        assert_eq!(ManagerConfig::from_path(&path).unwrap(), cfg);
    }
}
