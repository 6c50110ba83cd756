mod common;

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use common::TestApp;

fn campaign_body(title: &str, status: &str) -> Value {
    json!({
        "title": title,
        "description": "Showcase the new collection",
        "category": ["Fashion"],
        "budget": 5000,
        "platforms": ["INSTAGRAM"],
        "status": status
    })
}

#[tokio::test]
async fn campaign_lifecycle() {
    let app = TestApp::new();
    let brand = app.signup("Sarah Miller", "sarah@fashionnova.com", "BRAND").await;
    let rival = app.signup("Mike Johnson", "mike@techgadgets.com", "BRAND").await;
    let influencer = app.signup("Emma Wilson", "emma@fitness.com", "INFLUENCER").await;

    let created = app
        .post("/campaigns", Some(&brand.token), json!({ "title": "Fall Drop", "description": "Autumn looks" }))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["status"], "DRAFT");
    let id = created.body["id"].as_str().unwrap().to_string();

    // Drafts are hidden from influencers and other brands.
    assert_eq!(app.get(&format!("/campaigns/{id}"), Some(&influencer.token)).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get(&format!("/campaigns/{id}"), Some(&rival.token)).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get(&format!("/campaigns/{id}"), Some(&brand.token)).await.status, StatusCode::OK);

    let rival_edit = app
        .patch(&format!("/campaigns/{id}"), Some(&rival.token), json!({ "status": "ACTIVE" }))
        .await;
    assert_eq!(rival_edit.status, StatusCode::NOT_FOUND);

    let activated = app
        .patch(&format!("/campaigns/{id}"), Some(&brand.token), json!({ "status": "ACTIVE", "budget": 7500 }))
        .await;
    assert_eq!(activated.status, StatusCode::OK);
    assert_eq!(activated.body["status"], "ACTIVE");
    assert_eq!(activated.body["budget"], 7500);
    assert_eq!(activated.body["title"], "Fall Drop");

    let with_requirements = app
        .patch(&format!("/campaigns/{id}"), Some(&brand.token), json!({ "requirements": "Two reels" }))
        .await;
    assert_eq!(with_requirements.body["requirements"], "Two reels");
    let cleared = app
        .patch(&format!("/campaigns/{id}"), Some(&brand.token), json!({ "requirements": "" }))
        .await;
    assert_eq!(cleared.status, StatusCode::OK);
    assert!(cleared.body["requirements"].is_null());
    assert_eq!(cleared.body["budget"], 7500);

    let listed = app.get("/campaigns", Some(&influencer.token)).await;
    assert_eq!(listed.body.as_array().unwrap().len(), 1);
    let rival_list = app.get("/campaigns", Some(&rival.token)).await;
    assert!(rival_list.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn campaign_validation_and_roles() {
    let app = TestApp::new();
    let brand = app.signup("Sarah Miller", "sarah@fashionnova.com", "BRAND").await;
    let influencer = app.signup("Emma Wilson", "emma@fitness.com", "INFLUENCER").await;

    let forbidden = app.post("/campaigns", Some(&influencer.token), campaign_body("Nope", "ACTIVE")).await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let negative = app
        .post("/campaigns", Some(&brand.token), json!({ "title": "T", "description": "D", "budget": -10 }))
        .await;
    assert_eq!(negative.status, StatusCode::BAD_REQUEST);

    let dates = app
        .post(
            "/campaigns",
            Some(&brand.token),
            json!({ "title": "T", "description": "D", "start_date": "2024-09-01", "end_date": "2024-08-01" }),
        )
        .await;
    assert_eq!(dates.status, StatusCode::BAD_REQUEST);

    let missing = app.get("/campaigns/00000000-0000-0000-0000-000000000000", Some(&brand.token)).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn applications_flow_through_review() {
    let app = TestApp::new();
    let brand = app.signup("Sarah Miller", "sarah@fashionnova.com", "BRAND").await;
    let influencer = app.signup("Emma Wilson", "emma@fitness.com", "INFLUENCER").await;

    let draft = app.post("/campaigns", Some(&brand.token), campaign_body("Draft", "DRAFT")).await;
    let draft_id = draft.body["id"].as_str().unwrap().to_string();
    let closed = app
        .post(&format!("/campaigns/{draft_id}/applications"), Some(&influencer.token), json!({}))
        .await;
    assert_eq!(closed.status, StatusCode::BAD_REQUEST);

    let live = app.post("/campaigns", Some(&brand.token), campaign_body("Live", "ACTIVE")).await;
    let live_id = live.body["id"].as_str().unwrap().to_string();

    let applied = app
        .post(
            &format!("/campaigns/{live_id}/applications"),
            Some(&influencer.token),
            json!({ "message": "I would love to join!" }),
        )
        .await;
    assert_eq!(applied.status, StatusCode::CREATED);
    assert_eq!(applied.body["status"], "PENDING");
    let application_id = applied.body["application_id"].as_str().unwrap().to_string();

    let again = app
        .post(&format!("/campaigns/{live_id}/applications"), Some(&influencer.token), json!({}))
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);

    let brand_apply = app
        .post(&format!("/campaigns/{live_id}/applications"), Some(&brand.token), json!({}))
        .await;
    assert_eq!(brand_apply.status, StatusCode::FORBIDDEN);

    let listed = app.get(&format!("/campaigns/{live_id}/applications"), Some(&brand.token)).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body[0]["influencer_name"], "Emma Wilson");
    assert_eq!(listed.body[0]["message"], "I would love to join!");

    let pending = app
        .patch(
            &format!("/campaigns/{live_id}/applications/{application_id}"),
            Some(&brand.token),
            json!({ "status": "PENDING" }),
        )
        .await;
    assert_eq!(pending.status, StatusCode::BAD_REQUEST);

    let accepted = app
        .patch(
            &format!("/campaigns/{live_id}/applications/{application_id}"),
            Some(&brand.token),
            json!({ "status": "ACCEPTED" }),
        )
        .await;
    assert_eq!(accepted.status, StatusCode::OK);
    assert_eq!(accepted.body["status"], "ACCEPTED");

    let dashboard = app.get("/dashboard/brand", Some(&brand.token)).await;
    assert_eq!(dashboard.body["stats"]["total_campaigns"], 2);
    assert_eq!(dashboard.body["stats"]["active_campaigns"], 1);
    assert_eq!(dashboard.body["stats"]["total_influencers"], 1);
    assert_eq!(dashboard.body["stats"]["committed_budget"], 5000);
    assert_eq!(dashboard.body["recent_campaigns"][0]["title"], "Live");
    assert_eq!(dashboard.body["recent_campaigns"][0]["influencer_count"], 1);

    let mine = app.get("/dashboard/influencer", Some(&influencer.token)).await;
    assert_eq!(mine.status, StatusCode::OK);
    assert_eq!(mine.body["stats"]["active_campaigns"], 1);
    assert_eq!(mine.body["campaigns"][0]["brand_name"], "Sarah Miller");
    assert_eq!(mine.body["campaigns"][0]["application_status"], "ACCEPTED");
    assert!(mine.body["opportunities"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn messaging_between_brand_and_influencer() {
    let app = TestApp::new();
    let brand = app.signup("Sarah Miller", "sarah@fashionnova.com", "BRAND").await;
    let influencer = app.signup("Emma Wilson", "emma@fitness.com", "INFLUENCER").await;

    let to_self = app
        .post(
            "/messages",
            Some(&brand.token),
            json!({ "receiver_id": brand.id, "subject": "Hi", "content": "Me" }),
        )
        .await;
    assert_eq!(to_self.status, StatusCode::BAD_REQUEST);

    let to_nobody = app
        .post(
            "/messages",
            Some(&brand.token),
            json!({ "receiver_id": "00000000-0000-0000-0000-000000000001", "subject": "Hi", "content": "Hello" }),
        )
        .await;
    assert_eq!(to_nobody.status, StatusCode::NOT_FOUND);

    let long_content = "We love your content! ".repeat(10);
    let sent = app
        .post(
            "/messages",
            Some(&brand.token),
            json!({ "receiver_id": influencer.id, "subject": "Collaboration", "content": long_content }),
        )
        .await;
    assert_eq!(sent.status, StatusCode::CREATED);
    assert_eq!(sent.body["status"], "SENT");
    assert_eq!(sent.body["counterpart_name"], "Emma Wilson");
    let message_id = sent.body["id"].as_str().unwrap().to_string();

    let inbox = app.get("/messages", Some(&influencer.token)).await;
    assert_eq!(inbox.body.as_array().unwrap().len(), 1);
    assert_eq!(inbox.body[0]["counterpart_name"], "Sarah Miller");
    let outbox = app.get("/messages?folder=sent", Some(&brand.token)).await;
    assert_eq!(outbox.body.as_array().unwrap().len(), 1);

    let not_receiver = app
        .request(Method::POST, &format!("/messages/{message_id}/read"), Some(&brand.token), None)
        .await;
    assert_eq!(not_receiver.status, StatusCode::NOT_FOUND);

    let before = app.get("/dashboard/influencer", Some(&influencer.token)).await;
    assert_eq!(before.body["stats"]["unread_messages"], 1);

    let read = app
        .request(Method::POST, &format!("/messages/{message_id}/read"), Some(&influencer.token), None)
        .await;
    assert_eq!(read.status, StatusCode::NO_CONTENT);

    let after = app.get("/dashboard/influencer", Some(&influencer.token)).await;
    assert_eq!(after.body["stats"]["unread_messages"], 0);
}

#[tokio::test]
async fn brand_dashboard_previews_are_truncated() {
    let app = TestApp::new();
    let brand = app.signup("Sarah Miller", "sarah@fashionnova.com", "BRAND").await;
    let influencer = app.signup("Emma Wilson", "emma@fitness.com", "INFLUENCER").await;

    let content = "x".repeat(250);
    app.post(
        "/messages",
        Some(&influencer.token),
        json!({ "receiver_id": brand.id, "subject": "Pitch", "content": content }),
    )
    .await;

    let dashboard = app.get("/dashboard/brand", Some(&brand.token)).await;
    let preview = dashboard.body["recent_messages"][0]["preview"].as_str().unwrap();
    assert_eq!(preview.chars().count(), 103);
    assert!(preview.ends_with("..."));
    assert_eq!(dashboard.body["recent_messages"][0]["sender_name"], "Emma Wilson");
    assert_eq!(dashboard.body["recent_messages"][0]["is_read"], false);
    assert_eq!(dashboard.body["stats"]["unread_messages"], 1);
}

#[tokio::test]
async fn influencer_profile_updates_and_socials() {
    let app = TestApp::new();
    let influencer = app.signup("Emma Wilson", "emma@fitness.com", "INFLUENCER").await;
    let brand = app.signup("Sarah Miller", "sarah@fashionnova.com", "BRAND").await;

    let partial = app
        .put("/profile/influencer", Some(&influencer.token), json!({ "bio": "Personal trainer" }))
        .await;
    assert_eq!(partial.status, StatusCode::OK);
    assert_eq!(partial.body["profile_completed"], false);

    let complete = app
        .put(
            "/profile/influencer",
            Some(&influencer.token),
            json!({
                "bio": "Personal trainer",
                "location": "Miami, FL",
                "category": ["Fitness", "Wellness"],
                "languages": ["English"],
                "rate": 800
            }),
        )
        .await;
    assert_eq!(complete.body["profile_completed"], true);
    assert_eq!(complete.body["rate"], 800);

    let bad_rate = app
        .post(
            "/profile/influencer/socials",
            Some(&influencer.token),
            json!({ "platform": "INSTAGRAM", "username": "emmafitness", "engagement_rate": 120.0 }),
        )
        .await;
    assert_eq!(bad_rate.status, StatusCode::BAD_REQUEST);

    for followers in [67_000, 70_000] {
        let added = app
            .post(
                "/profile/influencer/socials",
                Some(&influencer.token),
                json!({
                    "platform": "INSTAGRAM",
                    "username": "emmafitness",
                    "followers_count": followers,
                    "engagement_rate": 6.8
                }),
            )
            .await;
        assert_eq!(added.status, StatusCode::CREATED);
        assert_eq!(added.body["followers_count"], followers);
    }

    let me = app.get("/me", Some(&influencer.token)).await;
    let socials = me.body["influencer_profile"]["social_profiles"].as_array().unwrap();
    assert_eq!(socials.len(), 1);
    assert_eq!(socials[0]["followers_count"], 70_000);

    let brand_edit = app.put("/profile/influencer", Some(&brand.token), json!({ "bio": "x" })).await;
    assert_eq!(brand_edit.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn search_over_seeded_influencers() {
    let app = TestApp::seeded();
    let brand = app.login_as("sarah@fashionnova.com", "password123").await;
    let influencer = app.login_as("sarah@lifestyle.com", "password123").await;

    let denied = app.get("/influencers/search", Some(&influencer.token)).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let all = app.get("/influencers/search", Some(&brand.token)).await;
    assert_eq!(all.status, StatusCode::OK);
    let cards = all.body.as_array().unwrap();
    assert_eq!(cards.len(), 5);
    assert_eq!(cards[0]["name"], "Lisa Park");
    assert_eq!(cards[0]["total_followers"], 596_000);
    let followers: Vec<i64> = cards.iter().map(|c| c["total_followers"].as_i64().unwrap()).collect();
    assert!(followers.windows(2).all(|w| w[0] >= w[1]));

    let tiktok_verified = app
        .get("/influencers/search?platform=TIKTOK&verified=true", Some(&brand.token))
        .await;
    let names: Vec<&str> = tiktok_verified
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Lisa Park", "Mike Chen"]);

    let by_text = app.get("/influencers/search?q=cuisine", Some(&brand.token)).await;
    assert_eq!(by_text.body.as_array().unwrap().len(), 1);
    assert_eq!(by_text.body[0]["handle"], "@mikeeats");

    let unavailable = app.get("/influencers/search?available=false", Some(&brand.token)).await;
    assert_eq!(unavailable.body.as_array().unwrap().len(), 1);
    assert_eq!(unavailable.body[0]["name"], "Alex Rodriguez");

    let bounded = app
        .get("/influencers/search?min_followers=200000&max_followers=300000", Some(&brand.token))
        .await;
    let names: Vec<&str> = bounded
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Emma Wilson"]);
}

#[tokio::test]
async fn seeded_influencer_dashboard() {
    let app = TestApp::seeded();
    let sarah = app.login_as("sarah@lifestyle.com", "password123").await;

    let dashboard = app.get("/dashboard/influencer", Some(&sarah.token)).await;
    assert_eq!(dashboard.status, StatusCode::OK);
    assert_eq!(dashboard.body["stats"]["total_followers"], 170_000);
    assert_eq!(dashboard.body["stats"]["avg_engagement"], 5.5);
    assert_eq!(dashboard.body["stats"]["active_campaigns"], 1);
    assert_eq!(dashboard.body["stats"]["unread_messages"], 0);
    assert_eq!(dashboard.body["campaigns"][0]["brand_name"], "Fashion Nova");
    assert_eq!(dashboard.body["opportunities"][0]["title"], "Tech Product Reviews");
    assert_eq!(dashboard.body["opportunities"][0]["applicants"], 1);
}

#[tokio::test]
async fn diagnostics_report_without_leaking() {
    let app = TestApp::seeded();

    let health = app.get("/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "ok");

    let db = app.get("/diagnostics/db", None).await;
    assert_eq!(db.status, StatusCode::OK);
    assert_eq!(db.body["database"], "connected");
    assert_eq!(db.body["user_count"], 9);
    assert_eq!(db.body["test_user"], "found");

    let env = app.get("/diagnostics/env", None).await;
    assert_eq!(env.status, StatusCode::OK);
    assert_eq!(env.body["environment"], "test");
    assert!(!env.body.to_string().contains(common::TEST_SECRET));
}
