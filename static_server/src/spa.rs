use std::path::PathBuf;

use actix_files::{Files, NamedFile};
use actix_web::dev::{ServiceRequest, ServiceResponse, fn_service};
use actix_web::web::ServiceConfig;

/// Static files from `dist`; any other path gets `index.html` so that the
/// browser router can resolve `/admin/login`, `/user/cars`…
pub fn configure(dist: PathBuf) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let index = dist.join("index.html");
        cfg.service(
            Files::new("/", &dist)
                .index_file("index.html")
                .default_handler(fn_service(move |req: ServiceRequest| {
                    let index = index.clone();
                    async move {
                        let (req, _) = req.into_parts();
                        let file = NamedFile::open_async(&index).await?;
                        let res = file.into_response(&req);
                        Ok(ServiceResponse::new(req, res))
                    }
                })),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};

    use super::*;

    fn dist() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<html>drive sync</html>").unwrap();
        fs::write(dir.path().join("app.js"), "console.log('app')").unwrap();
        dir
    }

    #[actix_web::test]
    async fn unknown_routes_fall_back_to_index() {
        let dir = dist();
        let app = test::init_service(App::new().configure(configure(dir.path().to_path_buf()))).await;

        for path in ["/admin/dashboard/users", "/user/cars", "/login"] {
            let req = test::TestRequest::get().uri(path).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "{path}");
            let body = test::read_body(resp).await;
            assert_eq!(body, "<html>drive sync</html>");
        }
    }

    #[actix_web::test]
    async fn assets_are_served_as_is() {
        let dir = dist();
        let app = test::init_service(App::new().configure(configure(dir.path().to_path_buf()))).await;

        let req = test::TestRequest::get().uri("/app.js").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "console.log('app')");

        let req = test::TestRequest::get().uri("/").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "<html>drive sync</html>");
    }
}
