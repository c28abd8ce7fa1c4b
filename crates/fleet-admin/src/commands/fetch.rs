//! `fetch` command: pull a resource list from the backend and export it

use anyhow::{bail, Context, Result};
use fleet_client::{ApiClient, Resource};
use serde_json::Value;
use tracing::info;

use super::export::{rows_from_value, write_export};
use crate::cli::ExportArgs;
use crate::context::AppContext;

pub async fn run(
    ctx: &AppContext,
    resource: Resource,
    enveloped: bool,
    args: &ExportArgs,
) -> Result<String> {
    let session = ctx
        .session
        .load()
        .context("Not signed in; run `session login` first")?;
    let role = &session.user.role;

    // Same gate the console applies before showing the page.
    if !ctx.resolver.is_path_allowed(resource.page_path(), role) {
        bail!("Role {} may not open {}", role, resource.page_path());
    }

    let client = ApiClient::new(&ctx.config.api, ctx.session.clone())?;
    let path = resource.api_path();
    let body: Value = if enveloped {
        client.get_enveloped(path).await?
    } else {
        client.get(path).await?
    };

    let rows = rows_from_value(body)?;
    info!("Fetched {} {} rows", rows.len(), resource);
    write_export(ctx, args, rows, resource.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support;
    use fleet_access::domain::{Session, SessionUser};
    use fleet_export::ExportFormat;
    use fleet_shared::Role;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn csv_args(columns: &[&str]) -> ExportArgs {
        ExportArgs {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            format: ExportFormat::Csv,
            out: None,
            file_name: None,
            no_headers: false,
            title: None,
            subtitle: None,
            footer: None,
            summary: Vec::new(),
            landscape: false,
            print: false,
            rows_per_page: None,
        }
    }

    fn sign_in(ctx: &AppContext, role: &str) {
        ctx.session
            .save(&Session {
                user: SessionUser::new("1", "Rina", Role::from(role), "rina@fleet.io"),
                token: "token-xyz".into(),
            })
            .unwrap();
    }

    #[tokio::test]
    async fn test_fetch_and_export() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/reports/vehicle-makes"))
            .and(header("Authorization", "Bearer token-xyz"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [{"make": "Toyota", "count": 12}, {"make": "Daihatsu", "count": 4}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let ctx = test_support::context_with_api(dir.path(), &server.uri());
        sign_in(&ctx, "dispatcher");

        let out = run(
            &ctx,
            Resource::VehicleMakesReport,
            true,
            &csv_args(&["Make=make", "Vehicles=count"]),
        )
        .await
        .unwrap();
        assert!(out.starts_with("Wrote 2 rows"));

        let written = std::fs::read_to_string(dir.path().join("vehicle-makes.csv")).unwrap();
        assert_eq!(written, "Make,Vehicles\nToyota,12\nDaihatsu,4");
    }

    #[tokio::test]
    async fn test_fetch_denied_for_role() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let ctx = test_support::context_with_api(dir.path(), &server.uri());
        sign_in(&ctx, "support");

        let err = run(&ctx, Resource::Drivers, false, &csv_args(&["Name=name"]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("may not open /admin/drivers"));
    }

    #[tokio::test]
    async fn test_admin_pages_closed_to_dispatcher() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let ctx = test_support::context_with_api(dir.path(), &server.uri());
        sign_in(&ctx, "dispatcher");

        for resource in [Resource::Users, Resource::Roles] {
            let err = run(&ctx, resource, false, &csv_args(&["Name=name"]))
                .await
                .unwrap_err();
            assert!(err.to_string().contains("may not open /admin/"));
        }
    }

    #[tokio::test]
    async fn test_fetch_requires_session() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_support::context(dir.path());
        let err = run(&ctx, Resource::Drivers, false, &csv_args(&["Name=name"]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Not signed in"));
    }
}
