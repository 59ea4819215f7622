//! API integration tests against in-memory backends.

mod common;

use std::sync::atomic::Ordering;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use reel_api::ApiConfig;

use common::{b64, post_json, post_raw, test_app, test_app_with, unb64, FAIL};

fn assert_window(body: &Value, start: u64, end: u64, total: u64, next: Option<u64>) {
    assert_eq!(body["batch_start"], start);
    assert_eq!(body["batch_end"], end);
    assert_eq!(body["total_parts"], total);
    assert_eq!(body["has_more"], next.is_some());
    match next {
        Some(n) => assert_eq!(body["next_batch_index"], n),
        None => assert!(body["next_batch_index"].is_null()),
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();

    let response = app
        .router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = test_app();

    let response = app
        .router
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("X-Request-ID", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "abc-123");
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = test_app();

    let response = app
        .router
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/split_story")
                .header("Origin", "https://example.com")
                .header("Access-Control-Request-Method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_split_story() {
    let app = test_app();

    let (status, body) = post_json(
        &app.router,
        "/api/split_story",
        json!({
            "text": "0 (1m 2s): Sentence one. Sentence two. Sentence three.",
            "target_words": 3
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["parts"],
        json!(["Sentence one.", "Sentence two.", "Sentence three."])
    );
    assert_eq!(body["part_count"], 3);
    assert_eq!(body["total_words"], 6);
    assert_eq!(body["avg_words_per_part"], 2);
    assert_eq!(body["target_words"], 3);
}

#[tokio::test]
async fn test_split_story_validation() {
    let app = test_app();

    let (status, body) = post_json(&app.router, "/api/split_story", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing 'text' field in request");

    let (status, body) = post_json(&app.router, "/api/split_story", json!({"text": "   "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Text cannot be empty");

    let (status, body) =
        post_json(&app.router, "/api/split_story", json!({"text": "[MUSIC] [SFX]"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Could not create any story parts from text");

    let (status, _) = post_json(
        &app.router,
        "/api/split_story",
        json!({"text": "Hello.", "target_words": 0}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(
        &app.router,
        "/api/split_story",
        json!({"text": "Hello.", "target_words": u64::MAX / 2}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "target_words must be at most 100000");
}

#[tokio::test]
async fn test_malformed_json_gets_json_error() {
    let app = test_app();

    let (status, body) = post_raw(&app.router, "/api/split_story", "{not json".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON"));
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let app = test_app_with(ApiConfig {
        max_body_size: 256,
        ..Default::default()
    });

    let text = "word ".repeat(200);
    let (status, body) = post_json(&app.router, "/api/split_story", json!({"text": text})).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_translate_windows() {
    let app = test_app();
    let parts = json!(["one", "  ", "three"]);

    let (status, body) = post_json(
        &app.router,
        "/api/translate_text",
        json!({"parts": parts, "batch_index": 0, "batch_size": 2}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["translated_batch"], json!(["tl:one", ""]));
    assert_window(&body, 0, 2, 3, Some(1));
    assert_eq!(body["original_chars"], 5);
    assert_eq!(body["translated_chars"], 6);

    let (status, body) = post_json(
        &app.router,
        "/api/translate_text",
        json!({"parts": parts, "batch_index": 1, "batch_size": 2}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["translated_batch"], json!(["tl:three"]));
    assert_window(&body, 2, 3, 3, None);

    // The blank part never reached the backend
    assert_eq!(app.translator.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_translate_failure_aborts_batch() {
    let app = test_app();

    let (status, body) = post_json(
        &app.router,
        "/api/translate_text",
        json!({"parts": ["one", format!("two {FAIL}"), "three"], "batch_size": 3}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Translation failed at part 2: Translation API error: boom"
    );
    assert!(body.get("translated_batch").is_none());
    assert_eq!(app.translator.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_translate_window_validation() {
    let app = test_app();

    let (status, body) = post_json(&app.router, "/api/translate_text", json!({"parts": []})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Parts array cannot be empty");

    let (status, body) = post_json(
        &app.router,
        "/api/translate_text",
        json!({"parts": ["a"], "batch_size": 0}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "batch_size must be greater than 0");
}

#[tokio::test]
async fn test_tts_isolates_failures() {
    let app = test_app();

    let (status, body) = post_json(
        &app.router,
        "/api/generate_tts",
        json!({"parts": ["one", FAIL, "three"], "batch_size": 3, "voice_lang": "xx"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let batch = body["audio_batch"].as_array().unwrap();
    assert_eq!(batch.len(), 3);

    for item in [&batch[0], &batch[2]] {
        let audio = unb64(&item["audio"]);
        assert_eq!(item["size"], audio.len());
        assert!(audio.starts_with(b"mp3:tl:"));
        assert_eq!(item["duration"], 4.26);
        assert_eq!(item["format"], "mp3");
    }

    assert!(batch[1]["audio"].is_null());
    assert_eq!(batch[1]["size"], 0);
    assert_eq!(
        batch[1]["error"],
        "TTS API rate limit reached. Please wait a moment and try again."
    );
    assert_window(&body, 0, 3, 3, None);
}

#[tokio::test]
async fn test_tts_empty_text_skips_backend() {
    let app = test_app();

    let (status, body) =
        post_json(&app.router, "/api/generate_tts", json!({"parts": ["", "hello"]})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["audio_batch"][0]["error"], "Empty text");
    assert!(body["audio_batch"][1]["audio"].is_string());
    assert_eq!(app.speech.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_images_isolate_failures() {
    let app = test_app();

    let (status, body) = post_json(
        &app.router,
        "/api/generate_images",
        json!({
            "parts": ["The abandoned hospital.", "FAILS here.", "garbage output."],
            "batch_size": 3
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let batch = body["image_batch"].as_array().unwrap();

    let image = unb64(&batch[0]["image"]);
    assert_eq!(batch[0]["size"], image.len());
    assert!(image.starts_with(&[0xFF, 0xD8]));
    assert_eq!(batch[0]["width"], 96);
    assert_eq!(batch[0]["height"], 160);
    assert_eq!(batch[0]["format"], "jpeg");
    assert!(batch[0]["prompt"].as_str().unwrap().contains("abandoned"));

    assert!(batch[1]["image"].is_null());
    assert_eq!(batch[1]["error"], "HuggingFace API error: model crashed");

    assert!(batch[2]["image"].is_null());
    assert!(batch[2]["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid image response:"));

    let requests = app.images.prompts.lock().unwrap();
    assert_eq!(requests[0].width, 1080);
    assert_eq!(requests[0].height, 1920);
}

#[tokio::test]
async fn test_images_default_batch_size_is_one() {
    let app = test_app();

    let (_, body) = post_json(
        &app.router,
        "/api/generate_images",
        json!({"parts": ["first part here.", "second part here."]}),
    )
    .await;

    assert_eq!(body["image_batch"].as_array().unwrap().len(), 1);
    assert_eq!(body["batch_size"], 1);
    assert_window(&body, 0, 1, 2, Some(1));
}

#[tokio::test]
async fn test_create_videos_isolates_failures() {
    let app = test_app();
    let audio = json!({"audio": b64(b"mp3"), "duration": 12.5});
    let image = json!({"image": b64(b"png")});

    let (status, body) = post_json(
        &app.router,
        "/api/create_videos",
        json!({
            "audio_files": [audio, audio, {"audio": null, "duration": 0}],
            "image_files": [image, image, image],
            "translated_parts": ["Unang bahagi", FAIL, "Ikatlo"],
            "batch_size": 3
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let batch = body["video_batch"].as_array().unwrap();

    let video = unb64(&batch[0]["video"]);
    assert_eq!(video, b"mp4:Unang bahagi");
    assert_eq!(batch[0]["size"], video.len());
    assert_eq!(batch[0]["duration"], 12.5);
    assert_eq!(batch[0]["width"], 1080);
    assert_eq!(batch[0]["height"], 1920);
    assert_eq!(batch[0]["fps"], 30);
    assert_eq!(batch[0]["format"], "mp4");

    assert!(batch[1]["video"].is_null());
    assert_eq!(batch[1]["error"], "Internal error: encoder crashed");

    assert_eq!(batch[2]["error"], "Missing 'audio' data");
}

#[tokio::test]
async fn test_create_videos_validation() {
    let app = test_app();

    let (status, body) = post_json(
        &app.router,
        "/api/create_videos",
        json!({"audio_files": [], "image_files": []}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Missing required fields: audio_files, image_files, translated_parts"
    );

    let (status, body) = post_json(
        &app.router,
        "/api/create_videos",
        json!({"audio_files": [{}], "image_files": [], "translated_parts": ["a"]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "audio_files, image_files, and translated_parts must have the same length"
    );
}

#[tokio::test]
async fn test_create_long_video() {
    let app = test_app();

    let (status, body) = post_json(
        &app.router,
        "/api/create_long_video",
        json!({"video_files": [
            {"video": b64(b"aa"), "duration": 10.004},
            {"video": b64(b"bb"), "duration": 5.0}
        ]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(unb64(&body["video"]), b"aabb");
    assert_eq!(body["size"], 4);
    assert_eq!(body["duration"], 15.0);
    assert_eq!(body["total_parts"], 2);
    assert_eq!(body["format"], "mp4");
}

#[tokio::test]
async fn test_create_long_video_validation() {
    let app = test_app();

    let (status, body) =
        post_json(&app.router, "/api/create_long_video", json!({"video_files": []})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "video_files must be a non-empty array");

    let (status, body) = post_json(
        &app.router,
        "/api/create_long_video",
        json!({"video_files": [{"video": b64(b"aa")}, {"video": "%%%"}]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Part 2: Invalid base64 in 'video'"));
}

#[tokio::test]
async fn test_generate_metadata() {
    let app = test_app();

    let (status, body) = post_json(
        &app.router,
        "/api/generate_metadata",
        json!({"translated_parts": [
            "Ang multo sa bahay ay nagpakita. Takot na takot ang pamilya.",
            ""
        ]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_parts"], 2);
    assert_eq!(body["part_metadata"].as_array().unwrap().len(), 2);
    assert_eq!(body["part_metadata"][0]["part_number"], 1);
    assert!(body["part_metadata"][0]["title"]
        .as_str()
        .unwrap()
        .starts_with("Bahagi 1"));
    assert!(body["full_metadata"]["title"]
        .as_str()
        .unwrap()
        .starts_with("Buong Kwento: "));
    assert_eq!(body["full_metadata"]["total_parts"], 2);

    let (status, body) =
        post_json(&app.router, "/api/generate_metadata", json!({"translated_parts": []})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "translated_parts array cannot be empty");
}

#[tokio::test]
async fn test_generate_thumbnail() {
    let app = test_app();

    let (status, body) = post_json(
        &app.router,
        "/api/generate_thumbnail",
        json!({"title": "Ang Bahay sa Burol", "style": "true_crime"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let thumbnail = unb64(&body["thumbnail"]);
    assert!(thumbnail.starts_with(b"jpeg:Ang Bahay sa Burol"));
    assert_eq!(body["size"], thumbnail.len());
    assert_eq!(body["width"], 1280);
    assert_eq!(body["height"], 720);
    assert_eq!(body["format"], "jpeg");

    let requests = app.images.prompts.lock().unwrap();
    assert_eq!(requests[0].width, 1280);
    assert_eq!(requests[0].steps, 25);
    assert!(requests[0].prompt.starts_with("true crime scene"));
}

#[tokio::test]
async fn test_generate_thumbnail_errors() {
    let app = test_app();

    let (status, body) = post_json(&app.router, "/api/generate_thumbnail", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing 'title' field in request");

    let (status, body) = post_json(
        &app.router,
        "/api/generate_thumbnail",
        json!({"title": "This will fail"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Thumbnail generation failed: HuggingFace API error: model crashed"
    );
}

#[tokio::test]
async fn test_extract_text() {
    let app = test_app();

    let (status, body) = post_json(
        &app.router,
        "/api/extract_text",
        json!({"file": b64(b"%PDF-1.4 fake document")}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Page one.\nPage two.\n");
    assert_eq!(body["pages"], 3);
    assert_eq!(body["extracted_pages"], 2);
    assert_eq!(body["characters"], 20);
}

#[tokio::test]
async fn test_extract_text_rejections() {
    let app = test_app();

    let cases = [
        (json!({}), "No file uploaded"),
        (json!({"file": b64(b"plain text")}), "File is not a valid PDF"),
        (json!({"file": b64(b"%PDF-1.7 /Encrypt")}), "PDF is encrypted"),
    ];
    for (request, expected) in cases {
        let (status, body) = post_json(&app.router, "/api/extract_text", request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], expected);
    }

    let (status, _) = post_json(&app.router, "/api/extract_text", json!({"file": "@@@"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
