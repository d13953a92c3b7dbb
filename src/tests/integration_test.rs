//! End-to-end exercise of the presenter and player flows against the mock
//! broker: connect, subscribe to the admin topic, drive the quiz, and fold
//! the broadcast scoreboards into a leaderboard.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

use crate::quiz::events::generate_player_id;
use crate::quiz::{AdminEvent, AnswerSubmission, Leaderboard, topics};
use crate::session::{Session, SessionConfig, SessionHooks};
use crate::tests::mock_broker::MockBroker;
use crate::transport::frame::ClientFrame;

const WAIT: Duration = Duration::from_secs(2);
const POLL_ID: &str = "quiz123";

async fn connect(broker: &MockBroker) -> Session {
    let (connected_tx, mut connected_rx) = mpsc::unbounded_channel();
    let hooks = SessionHooks::new().on_connect(move || {
        let _ = connected_tx.send(());
    });
    let config = SessionConfig::new(broker.endpoint())
        .with_reconnect_delay(Duration::from_millis(100));
    let session = Session::new(config, hooks);
    session.connect();
    timeout(WAIT, connected_rx.recv())
        .await
        .expect("timed out waiting for connect")
        .expect("connect hook channel closed");
    session
}

#[tokio::test]
async fn integration_presenter_round_trip() {
    let broker = MockBroker::start().await;

    let presenter = connect(&broker).await;
    let admin_topic = topics::admin_topic(POLL_ID);

    let (payload_tx, mut payload_rx) = mpsc::unbounded_channel();
    presenter
        .subscribe(admin_topic.as_str(), move |payload| {
            let _ = payload_tx.send(payload.to_string());
        })
        .expect("subscribe to admin topic");
    timeout(WAIT, async {
        while !broker.has_subscription(&admin_topic) {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("broker never saw the admin subscription");

    // Presenter starts the quiz.
    presenter
        .publish(topics::start_request_destination(POLL_ID), "{}")
        .expect("publish start request");
    timeout(WAIT, async {
        loop {
            let started = broker.received().iter().any(|frame| {
                matches!(
                    frame,
                    ClientFrame::Send { destination, .. }
                        if destination == "/app/start_request/quiz123"
                )
            });
            if started {
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("broker never received the start request");

    // The broker advances the quiz and pushes two scoreboards.
    broker.publish(&admin_topic, r#"{"question_number":1}"#);
    broker.publish(
        &admin_topic,
        r#"{"scoreboard":[{"user_name":"ada","score":100},{"user_name":"grace","score":80}]}"#,
    );
    broker.publish(
        &admin_topic,
        r#"{"scoreboard":[{"user_name":"ada","score":150},{"user_name":"grace","score":180}]}"#,
    );
    broker.publish(&admin_topic, "");

    let mut leaderboard = Leaderboard::new();
    let mut question_number = 0;
    let mut finished = false;
    while !finished {
        let payload = timeout(WAIT, payload_rx.recv())
            .await
            .expect("timed out waiting for admin event")
            .expect("admin payload channel closed");
        match AdminEvent::decode(&payload).expect("decode admin event") {
            Some(AdminEvent::QuestionAdvance(number)) => question_number = number,
            Some(AdminEvent::ScoreboardUpdate(scoreboard)) => leaderboard.apply(&scoreboard),
            Some(AdminEvent::Finished) => finished = true,
            None => {}
        }
    }

    assert_eq!(question_number, 1);
    let standings = leaderboard.standings();
    assert_eq!(standings[0].name, "ada");
    assert_eq!(standings[0].score, 150);
    assert_eq!(standings[0].change, 50);
    assert_eq!(standings[1].name, "grace");
    assert_eq!(standings[1].score, 180);
    assert_eq!(standings[1].change, 100);
}

#[tokio::test]
async fn integration_player_submits_answer() {
    let broker = MockBroker::start().await;

    let player = connect(&broker).await;
    let player_id = generate_player_id();
    let submission = AnswerSubmission {
        player_id: player_id.clone(),
        is_correct: true,
    };
    let payload = serde_json::to_string(&submission).expect("serialize answer");

    player
        .publish(topics::answer_destination(POLL_ID), payload)
        .expect("publish answer");

    timeout(WAIT, async {
        loop {
            let answered = broker.received().iter().any(|frame| {
                matches!(
                    frame,
                    ClientFrame::Send { destination, payload, .. }
                        if destination == "/app/answer/quiz123"
                            && payload.contains(&player_id)
                            && payload.contains("\"isCorrect\":true")
                )
            });
            if answered {
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("broker never received the answer");

    player.disconnect();
}
