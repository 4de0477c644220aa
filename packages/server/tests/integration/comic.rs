use std::path::PathBuf;

use crate::common::{
    BANNER_BYTES, COVER_BYTES, MAX_IMAGE_SIZE, TestApp, comic_fields, comic_form, routes,
};

mod create {
    use super::*;

    #[tokio::test]
    async fn authenticated_user_can_create_a_comic_with_both_images() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app.create_comic(&token, "Berserk", "berserk").await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["alternative_name"], "berserk");
        assert_eq!(res.body["type_comics"], "Manga");
        assert_eq!(res.body["pegi"], "16+");
        assert_eq!(res.body["status"], "В процессе");
        assert_eq!(res.body["original_author"], "Artist");
        assert_eq!(res.body["tags"], serde_json::json!(["city", "night"]));

        let image_path = PathBuf::from(res.body["image_path"].as_str().unwrap());
        let banner_path = PathBuf::from(res.body["banner_path"].as_str().unwrap());
        assert_eq!(image_path, app.media_path("berserk/cover/cover.jpg"));
        assert_eq!(banner_path, app.media_path("berserk/banners/banner.jpg"));
        assert_eq!(std::fs::read(&image_path).unwrap(), COVER_BYTES);
        assert_eq!(std::fs::read(&banner_path).unwrap(), BANNER_BYTES);
        assert!(app.media_path("berserk/chapters").is_dir());
    }

    #[tokio::test]
    async fn cyrillic_name_without_alternative_name_is_slugified() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app.create_comic(&token, "Полночь", "").await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["alternative_name"], "polnoch");
        assert_eq!(res.body["name"], "Полночь");
        assert!(app.media_path("polnoch/cover/cover.jpg").is_file());
    }

    #[tokio::test]
    async fn cyrillic_alternative_name_is_replaced_by_slug() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app.create_comic(&token, "Полночь", "полночь").await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["alternative_name"], "polnoch");
    }

    #[tokio::test]
    async fn ascii_alternative_name_is_kept_for_a_cyrillic_title() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app.create_comic(&token, "Полночь", "midnight").await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["alternative_name"], "midnight");
        assert!(app.media_path("midnight").is_dir());
        assert!(!app.media_path("polnoch").exists());
    }

    #[tokio::test]
    async fn duplicate_alternative_name_is_rejected_without_touching_files() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let first = app.create_comic(&token, "Berserk", "berserk").await;
        assert_eq!(first.status, 201, "{}", first.text);

        let form = comic_form(
            &comic_fields("Berserk Deluxe", "berserk"),
            Some(b"other cover"),
            Some(b"other banner"),
        );
        let res = app.post_multipart(routes::COMICS, form, Some(&token)).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
        assert_eq!(
            std::fs::read(app.media_path("berserk/cover/cover.jpg")).unwrap(),
            COVER_BYTES
        );
        assert_eq!(app.catalog.len().await, 1);
    }

    #[tokio::test]
    async fn missing_images_are_a_validation_error() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let form = comic_form(&comic_fields("Berserk", "berserk"), Some(COVER_BYTES), None);
        let res = app.post_multipart(routes::COMICS, form, Some(&token)).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(!app.media_path("berserk").exists());
    }

    #[tokio::test]
    async fn missing_required_field_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let fields: Vec<_> = comic_fields("Berserk", "berserk")
            .into_iter()
            .filter(|(name, _)| *name != "pegi")
            .collect();
        let form = comic_form(&fields, Some(COVER_BYTES), Some(BANNER_BYTES));
        let res = app.post_multipart(routes::COMICS, form, Some(&token)).await;

        assert_eq!(res.status, 400);
        assert!(res.body["message"].as_str().unwrap().contains("pegi"));
    }

    #[tokio::test]
    async fn unknown_enum_value_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let mut fields = comic_fields("Berserk", "berserk");
        fields.push(("type_comics", "Novel".to_string()));
        let form = comic_form(&fields, Some(COVER_BYTES), Some(BANNER_BYTES));
        let res = app.post_multipart(routes::COMICS, form, Some(&token)).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn oversized_image_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let big = vec![0u8; MAX_IMAGE_SIZE as usize + 1];
        let form = comic_form(
            &comic_fields("Berserk", "berserk"),
            Some(COVER_BYTES),
            Some(&big),
        );
        let res = app.post_multipart(routes::COMICS, form, Some(&token)).await;

        assert_eq!(res.status, 413);
        assert_eq!(res.body["code"], "PAYLOAD_TOO_LARGE");
        assert_eq!(app.catalog.len().await, 0);
    }

    #[tokio::test]
    async fn anonymous_user_cannot_create() {
        let app = TestApp::spawn().await;

        let form = comic_form(
            &comic_fields("Berserk", "berserk"),
            Some(COVER_BYTES),
            Some(BANNER_BYTES),
        );
        let res = app.post_multipart(routes::COMICS, form, None).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
        assert!(!app.media_path("berserk").exists());
    }
}

mod read {
    use super::*;

    #[tokio::test]
    async fn created_comic_can_be_fetched_by_name_and_identifier() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        let created = app.create_comic(&token, "Полночь", "").await;
        assert_eq!(created.status, 201, "{}", created.text);

        let by_name = app.get_with_query(routes::COMIC_INFO, &[("name", "Полночь")]).await;
        assert_eq!(by_name.status, 200, "{}", by_name.text);
        assert_eq!(by_name.body, created.body);

        let by_id = app.get_without_token(&routes::comic("polnoch")).await;
        assert_eq!(by_id.status, 200);
        assert_eq!(by_id.id(), created.id());
    }

    #[tokio::test]
    async fn unknown_name_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get_with_query(routes::COMIC_INFO, &[("name", "Nothing")]).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn list_is_paginated_newest_first_and_hides_hidden_entries() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        for (name, alt) in [("Alpha", "alpha"), ("Beta", "beta"), ("Gamma", "gamma")] {
            let res = app.create_comic(&token, name, alt).await;
            assert_eq!(res.status, 201, "{}", res.text);
        }
        let mut hidden = comic_fields("Secret", "secret");
        hidden.push(("hidden", "true".to_string()));
        let res = app
            .post_multipart(
                routes::COMICS,
                comic_form(&hidden, Some(COVER_BYTES), Some(BANNER_BYTES)),
                Some(&token),
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);

        let res = app
            .get_without_token(&format!("{}?page=1&per_page=2", routes::COMICS))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["alternative_name"], "gamma");
        assert_eq!(data[1]["alternative_name"], "beta");
        assert_eq!(res.body["pagination"]["total"], 3);
        assert_eq!(res.body["pagination"]["total_pages"], 2);
    }

    #[tokio::test]
    async fn list_page_beyond_the_end_is_empty() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        app.create_comic(&token, "Berserk", "berserk").await;

        let res = app
            .get_without_token(&format!("{}?page={}", routes::COMICS, u64::MAX))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 0);
        assert_eq!(res.body["pagination"]["page"], u64::MAX);
        assert_eq!(res.body["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn list_search_is_case_insensitive() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        app.create_comic(&token, "Tower of God", "tower-of-god").await;
        app.create_comic(&token, "Berserk", "berserk").await;

        let res = app
            .get_without_token(&format!("{}?search=TOWER", routes::COMICS))
            .await;

        assert_eq!(res.status, 200);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["alternative_name"], "tower-of-god");
    }

    #[tokio::test]
    async fn cover_and_banner_can_be_downloaded() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        app.create_comic(&token, "Berserk", "berserk").await;

        let (status, content_type, bytes) = app.get_bytes(&routes::comic_cover("berserk")).await;
        assert_eq!(status, 200);
        assert_eq!(content_type.as_deref(), Some("image/jpeg"));
        assert_eq!(bytes, COVER_BYTES);

        let (status, _, bytes) = app.get_bytes(&routes::comic_banner("berserk")).await;
        assert_eq!(status, 200);
        assert_eq!(bytes, BANNER_BYTES);
    }

    #[tokio::test]
    async fn image_of_unknown_comic_is_not_found() {
        let app = TestApp::spawn().await;

        let (status, _, _) = app.get_bytes(&routes::comic_cover("nothing")).await;

        assert_eq!(status, 404);
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn new_cover_replaces_only_the_cover() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        let created = app.create_comic(&token, "Berserk", "berserk").await;
        assert_eq!(created.status, 201, "{}", created.text);

        let form = comic_form(&[], Some(b"new cover"), None);
        let res = app
            .patch_multipart(&routes::comic("berserk"), form, &token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["image_path"], created.body["image_path"]);
        assert_eq!(res.body["banner_path"], created.body["banner_path"]);
        assert_eq!(res.body["name"], "Berserk");
        assert_eq!(res.body["tags"], created.body["tags"]);
        assert_eq!(
            std::fs::read(app.media_path("berserk/cover/cover.jpg")).unwrap(),
            b"new cover"
        );
        assert_eq!(
            std::fs::read(app.media_path("berserk/banners/banner.jpg")).unwrap(),
            BANNER_BYTES
        );
    }

    #[tokio::test]
    async fn text_fields_are_patched() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        app.create_comic(&token, "Berserk", "berserk").await;

        let form = comic_form(
            &[
                ("likes", "42".to_string()),
                ("status", "finished".to_string()),
                ("genres", "dark fantasy".to_string()),
            ],
            None,
            None,
        );
        let res = app
            .patch_multipart(&routes::comic("berserk"), form, &token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["likes"], 42);
        assert_eq!(res.body["status"], "Окончено");
        assert_eq!(res.body["genres"], serde_json::json!(["dark fantasy"]));
        assert_eq!(res.body["pegi"], "16+");
    }

    #[tokio::test]
    async fn invalid_patch_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        app.create_comic(&token, "Berserk", "berserk").await;

        let form = comic_form(&[("rating", "11".to_string())], None, None);
        let res = app
            .patch_multipart(&routes::comic("berserk"), form, &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unknown_comic_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let form = comic_form(&[("likes", "1".to_string())], None, None);
        let res = app
            .patch_multipart(&routes::comic("nothing"), form, &token)
            .await;

        assert_eq!(res.status, 404);
        assert!(!app.media_path("nothing").exists());
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn delete_removes_record_and_media_directory() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        let created = app.create_comic(&token, "Berserk", "berserk").await;
        assert_eq!(created.status, 201, "{}", created.text);

        let res = app.delete_with_token(&routes::comic("berserk"), &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.id(), created.id());
        assert!(!app.media_path("berserk").exists());
        assert!(app.media_root().exists());

        let res = app.get_without_token(&routes::comic("berserk")).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn deleting_unknown_comic_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        app.create_comic(&token, "Berserk", "berserk").await;

        let res = app.delete_with_token(&routes::comic("nothing"), &token).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
        assert!(app.media_path("berserk/cover/cover.jpg").is_file());
    }

    #[tokio::test]
    async fn anonymous_user_cannot_delete() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        app.create_comic(&token, "Berserk", "berserk").await;

        let res = app
            .client
            .delete(format!("http://{}{}", app.addr, routes::comic("berserk")))
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(res.status().as_u16(), 401);
        assert!(app.media_path("berserk").is_dir());
    }
}
