use mockito::{Matcher, Mock, Server, ServerGuard};
use pipeflow_client::{ClientConfig, ClientError, OrchestrationClient, RunOptions, DEFAULT_EXPERIMENT};
use pipeflow_core::{parse_assignments, CoreError};
use pipeflow_steps::{addition_pipeline, ADDITION_PIPELINE_NAME};
use serde_json::json;
use uuid::Uuid;

const EXPERIMENT_ID: &str = "0b5c4f1e-3d1a-4c55-9a43-2f6d8c1e9b10";
const RUN_ID: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";

async fn mock_health(server: &mut ServerGuard) -> Mock {
    server.mock("GET", "/apis/v1beta1/healthz")
          .with_status(200)
          .with_header("content-type", "application/json")
          .with_body(r#"{"commit_sha":"abc","tag_name":"1.8.5","multi_user":false}"#)
          .create_async()
          .await
}

fn experiment_filter(name: &str) -> String {
    json!({ "predicates": [{ "key": "name", "op": "EQUALS", "string_value": name }] }).to_string()
}

async fn mock_existing_experiment(server: &mut ServerGuard, name: &str) -> Mock {
    server.mock("GET", "/apis/v1beta1/experiments")
          .match_query(Matcher::UrlEncoded("filter".into(), experiment_filter(name)))
          .with_status(200)
          .with_header("content-type", "application/json")
          .with_body(json!({ "experiments": [{ "id": EXPERIMENT_ID, "name": name }], "total_size": 1 }).to_string())
          .create_async()
          .await
}

async fn connect(server: &ServerGuard) -> OrchestrationClient {
    OrchestrationClient::connect(ClientConfig::new(server.url())).await
                                                                 .expect("connect")
}

#[tokio::test]
async fn connect_probes_health_endpoint() {
    let mut server = Server::new_async().await;
    let health = mock_health(&mut server).await;

    let client = connect(&server).await;
    assert_eq!(client.config().host, server.url());
    health.assert_async().await;
    client.close();
}

#[tokio::test]
async fn connect_surfaces_authentication_failures() {
    let mut server = Server::new_async().await;
    let _health = server.mock("GET", "/apis/v1beta1/healthz")
                        .with_status(401)
                        .with_body("missing credentials")
                        .create_async()
                        .await;

    let err = OrchestrationClient::connect(ClientConfig::new(server.url())).await
                                                                         .unwrap_err();
    assert!(err.is_auth_error());
}

#[tokio::test]
async fn connect_rejects_invalid_host_without_network() {
    let err = OrchestrationClient::connect(ClientConfig::new("not a url")).await
                                                                        .unwrap_err();
    assert!(matches!(err, ClientError::Configuration(_)));
}

#[tokio::test]
async fn ensure_experiment_reuses_existing_one() {
    let mut server = Server::new_async().await;
    let _health = mock_health(&mut server).await;
    let list = mock_existing_experiment(&mut server, "Default").await;
    let create = server.mock("POST", "/apis/v1beta1/experiments")
                       .expect(0)
                       .create_async()
                       .await;

    let client = connect(&server).await;
    let experiment = client.ensure_experiment("Default").await.expect("experiment");
    assert_eq!(experiment.id, Some(Uuid::parse_str(EXPERIMENT_ID).expect("uuid")));
    list.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn ensure_experiment_creates_missing_one() {
    let mut server = Server::new_async().await;
    let _health = mock_health(&mut server).await;
    let _list = server.mock("GET", "/apis/v1beta1/experiments")
                      .match_query(Matcher::Any)
                      .with_status(200)
                      .with_body("{}")
                      .create_async()
                      .await;
    let create = server.mock("POST", "/apis/v1beta1/experiments")
                       .match_body(Matcher::PartialJson(json!({ "name": "nightly" })))
                       .with_status(200)
                       .with_body(json!({ "id": EXPERIMENT_ID, "name": "nightly" }).to_string())
                       .expect(1)
                       .create_async()
                       .await;

    let client = connect(&server).await;
    let experiment = client.ensure_experiment("nightly").await.expect("experiment");
    assert_eq!(experiment.name, "nightly");
    create.assert_async().await;
}

#[tokio::test]
async fn create_run_from_pipeline_posts_a_single_run() {
    let mut server = Server::new_async().await;
    let _health = mock_health(&mut server).await;
    let _list = mock_existing_experiment(&mut server, DEFAULT_EXPERIMENT).await;
    let runs = server.mock("POST", "/apis/v1beta1/runs")
                     .match_header("authorization", "Bearer t0k3n")
                     .match_body(Matcher::PartialJson(json!({
                         "name": "addition-smoke",
                         "pipeline_spec": {
                             "pipeline_name": ADDITION_PIPELINE_NAME,
                             "parameters": [{ "name": "a", "value": "3" }, { "name": "b", "value": "4" }]
                         },
                         "resource_references": [{
                             "key": { "type": "EXPERIMENT", "id": EXPERIMENT_ID },
                             "relationship": "OWNER"
                         }]
                     })))
                     .with_status(200)
                     .with_header("content-type", "application/json")
                     .with_body(json!({ "run": { "id": RUN_ID, "name": "addition-smoke" } }).to_string())
                     .expect(1)
                     .create_async()
                     .await;

    let config = ClientConfig::new(server.url()).with_api_token("t0k3n");
    let client = OrchestrationClient::connect(config).await.expect("connect");
    let pipeline = addition_pipeline("pipeflow:test").expect("pipeline");
    let overrides = parse_assignments(["a=3", "b=4"]).expect("args");
    let options = RunOptions { run_name: Some("addition-smoke".into()),
                               ..Default::default() };

    let handle = client.create_run_from_pipeline(&pipeline, &overrides, &options)
                       .await
                       .expect("run");

    runs.assert_async().await;
    assert_eq!(handle.run_id.to_string(), RUN_ID);
    assert_eq!(handle.experiment_id.to_string(), EXPERIMENT_ID);
    assert_eq!(handle.pipeline_name, ADDITION_PIPELINE_NAME);
    assert_eq!(handle.arguments,
               vec![("a".to_string(), "3".to_string()), ("b".to_string(), "4".to_string())]);
    assert_eq!(handle.url, format!("{}/#/runs/details/{}", server.url(), RUN_ID));
}

#[tokio::test]
async fn default_run_name_starts_with_pipeline_name() {
    let mut server = Server::new_async().await;
    let _health = mock_health(&mut server).await;
    let _list = mock_existing_experiment(&mut server, DEFAULT_EXPERIMENT).await;
    let _runs = server.mock("POST", "/apis/v1beta1/runs")
                      .with_status(200)
                      .with_body(json!({ "run": { "id": RUN_ID } }).to_string())
                      .create_async()
                      .await;

    let client = connect(&server).await;
    let pipeline = addition_pipeline("pipeflow:test").expect("pipeline");
    let handle = client.create_run_from_pipeline(&pipeline, &Default::default(), &RunOptions::default())
                       .await
                       .expect("run");

    assert!(handle.run_name.starts_with("Addition pipeline 20"), "{}", handle.run_name);
    assert_eq!(handle.arguments,
               vec![("a".to_string(), "1".to_string()), ("b".to_string(), "7".to_string())]);
}

#[tokio::test]
async fn invalid_arguments_never_reach_the_service() {
    let mut server = Server::new_async().await;
    let _health = mock_health(&mut server).await;
    let list = server.mock("GET", "/apis/v1beta1/experiments")
                     .match_query(Matcher::Any)
                     .expect(0)
                     .create_async()
                     .await;
    let runs = server.mock("POST", "/apis/v1beta1/runs").expect(0).create_async().await;

    let client = connect(&server).await;
    let pipeline = addition_pipeline("pipeflow:test").expect("pipeline");

    let unknown = parse_assignments(["c=1"]).expect("args");
    let err = client.create_run_from_pipeline(&pipeline, &unknown, &RunOptions::default())
                    .await
                    .unwrap_err();
    assert!(matches!(err, ClientError::Core(CoreError::UnknownParameter(_))));

    let not_numeric = parse_assignments(["a=three"]).expect("args");
    let err = client.create_run_from_pipeline(&pipeline, &not_numeric, &RunOptions::default())
                    .await
                    .unwrap_err();
    assert!(matches!(err, ClientError::Core(CoreError::TypeMismatch { .. })));

    list.assert_async().await;
    runs.assert_async().await;
}

#[tokio::test]
async fn second_upload_of_same_pipeline_is_a_conflict() {
    let mut server = Server::new_async().await;
    let _health = mock_health(&mut server).await;
    let first = server.mock("POST", "/apis/v1beta1/pipelines")
                      .match_body(Matcher::PartialJson(json!({ "name": ADDITION_PIPELINE_NAME })))
                      .with_status(200)
                      .with_body(json!({ "id": "p-1", "name": ADDITION_PIPELINE_NAME }).to_string())
                      .expect(1)
                      .create_async()
                      .await;

    let client = connect(&server).await;
    let pipeline = addition_pipeline("pipeflow:test").expect("pipeline");
    let registered = client.upload_pipeline(&pipeline).await.expect("first upload");
    assert_eq!(registered.id.as_deref(), Some("p-1"));
    first.assert_async().await;
    first.remove_async().await;

    let _conflict = server.mock("POST", "/apis/v1beta1/pipelines")
                          .with_status(409)
                          .with_body("pipeline with name 'Addition pipeline' already exists")
                          .create_async()
                          .await;
    let err = client.upload_pipeline(&pipeline).await.unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn get_run_decodes_run_detail() {
    let mut server = Server::new_async().await;
    let _health = mock_health(&mut server).await;
    let _run = server.mock("GET", format!("/apis/v1beta1/runs/{RUN_ID}").as_str())
                     .with_status(200)
                     .with_body(json!({
                         "run": {
                             "id": RUN_ID,
                             "name": "r",
                             "status": "Succeeded",
                             "resource_references": [{
                                 "key": { "type": "EXPERIMENT", "id": EXPERIMENT_ID },
                                 "relationship": "OWNER"
                             }]
                         }
                     }).to_string())
                     .create_async()
                     .await;

    let client = connect(&server).await;
    let run = client.get_run(Uuid::parse_str(RUN_ID).expect("uuid")).await.expect("run");
    assert_eq!(run.status, "Succeeded");
    assert_eq!(run.experiment_id(), Some(EXPERIMENT_ID));
}

#[tokio::test]
async fn missing_run_is_not_found() {
    let mut server = Server::new_async().await;
    let _health = mock_health(&mut server).await;
    let _run = server.mock("GET", Matcher::Regex(r"^/apis/v1beta1/runs/".into()))
                     .with_status(404)
                     .with_body("run not found")
                     .create_async()
                     .await;

    let client = connect(&server).await;
    let err = client.get_run(Uuid::nil()).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
}
