//! Dispatcher tests over in-memory frame streams and sinks.

use std::io;
use std::sync::Mutex;

use super::*;
use crate::domain::ports::{
    ComposePublishError, ComposePublisher, FeedClosedError, MockLiveUpdateSink,
};
use crate::domain::{AuthorId, AuthorKind, ComposeRequest, FeedEvent};
use crate::inbound::ws::live_channel;
use futures::channel::mpsc as frame_channel;
use futures::stream;
use rstest::rstest;
use serde_json::json;

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<FeedEvent>>,
}

impl RecordingSink {
    fn kinds_and_ids(&self) -> Vec<String> {
        self.events
            .lock()
            .expect("events lock")
            .iter()
            .map(|event| match event {
                FeedEvent::PostPublished(post) => format!("post:{}", post.id),
                FeedEvent::CommentPublished { comment, .. } => format!("comment:{}", comment.id),
            })
            .collect()
    }
}

impl LiveUpdateSink for RecordingSink {
    fn deliver(&self, event: FeedEvent) -> Result<(), FeedClosedError> {
        self.events.lock().expect("events lock").push(event);
        Ok(())
    }
}

type TestSocket = futures_util::sink::SinkMapErr<
    frame_channel::UnboundedSender<Message>,
    fn(frame_channel::SendError) -> WsProtocolError,
>;

fn socket() -> (TestSocket, frame_channel::UnboundedReceiver<Message>) {
    let (tx, rx) = frame_channel::unbounded();
    let map: fn(frame_channel::SendError) -> WsProtocolError =
        |_| WsProtocolError::Io(io::Error::other("test socket closed"));
    (tx.sink_map_err(map), rx)
}

fn text(value: &serde_json::Value) -> Result<Frame, WsProtocolError> {
    Ok(Frame::Text(value.to_string().into()))
}

fn post_frame(id: &str) -> Result<Frame, WsProtocolError> {
    text(&json!({
        "type": "post",
        "post": {
            "_id": id,
            "authorId": { "_id": "a1", "username": "ada" },
            "content": "hello"
        }
    }))
}

fn comment_frame(post_id: &str, id: &str) -> Result<Frame, WsProtocolError> {
    text(&json!({
        "type": "comment",
        "postId": post_id,
        "comment": {
            "_id": id,
            "postId": post_id,
            "authorId": { "_id": "a1", "username": "ada" },
            "content": "reply"
        }
    }))
}

fn close_reason(message: &Message) -> Option<&CloseReason> {
    match message {
        Message::Close(reason) => reason.as_ref(),
        _ => None,
    }
}

#[rstest]
#[tokio::test]
async fn forwards_events_in_arrival_order_and_skips_bad_frames() {
    let sink = Arc::new(RecordingSink::default());
    let (dispatcher, _publisher, _shutdown) = live_channel(sink.clone());
    let (socket, sent) = socket();
    let frames = stream::iter(vec![
        post_frame("p1"),
        text(&json!({ "type": "typing", "userId": "u1" })),
        Ok(Frame::Text("not json".to_owned().into())),
        text(&json!({ "type": "comment", "postId": "p1" })),
        comment_frame("p1", "c1"),
        Ok(Frame::Binary(b"\x00".to_vec().into())),
        comment_frame("p1", "c2"),
    ]);

    let end = dispatcher.run(frames, socket).await;

    assert!(matches!(end, LiveSessionEnd::StreamClosed));
    assert_eq!(
        sink.kinds_and_ids(),
        vec!["post:p1", "comment:c1", "comment:c2"]
    );
    let sent: Vec<Message> = sent.collect().await;
    assert!(sent.is_empty(), "stream end sends nothing: {sent:?}");
}

#[rstest]
#[tokio::test]
async fn answers_pings_with_pongs() {
    let (dispatcher, _publisher, _shutdown) = live_channel(Arc::new(RecordingSink::default()));
    let (socket, sent) = socket();
    let frames = stream::iter(vec![Ok(Frame::Ping(b"hb".to_vec().into()))]);

    dispatcher.run(frames, socket).await;

    let sent: Vec<Message> = sent.collect().await;
    assert_eq!(sent, vec![Message::Pong(b"hb".to_vec().into())]);
}

#[rstest]
#[tokio::test]
async fn server_close_is_echoed() {
    let (dispatcher, _publisher, _shutdown) = live_channel(Arc::new(RecordingSink::default()));
    let (socket, sent) = socket();
    let reason = CloseReason::from(CloseCode::Away);
    let frames = stream::iter(vec![
        Ok(Frame::Close(Some(reason.clone()))),
        post_frame("late"),
    ]);

    let end = dispatcher.run(frames, socket).await;

    assert!(matches!(end, LiveSessionEnd::ServerClosed(Some(_))));
    let sent: Vec<Message> = sent.collect().await;
    assert_eq!(sent, vec![Message::Close(Some(reason))]);
}

#[rstest]
#[tokio::test]
async fn closed_feed_ends_session_with_normal_close() {
    let mut sink = MockLiveUpdateSink::new();
    sink.expect_deliver()
        .times(1)
        .returning(|_| Err(FeedClosedError::Closed));
    let (dispatcher, _publisher, _shutdown) = live_channel(Arc::new(sink));
    let (socket, sent) = socket();
    let frames = stream::iter(vec![post_frame("p1"), post_frame("p2")]);

    let end = dispatcher.run(frames, socket).await;

    assert!(matches!(end, LiveSessionEnd::FeedClosed));
    let sent: Vec<Message> = sent.collect().await;
    let reason = sent.first().and_then(close_reason).expect("close frame");
    assert_eq!(reason.code, CloseCode::Normal);
}

#[rstest]
#[tokio::test]
async fn protocol_errors_close_with_protocol_code() {
    let (dispatcher, _publisher, _shutdown) = live_channel(Arc::new(RecordingSink::default()));
    let (socket, sent) = socket();
    let frames = stream::iter(vec![Err(WsProtocolError::BadOpCode)]);

    let end = dispatcher.run(frames, socket).await;

    assert!(matches!(end, LiveSessionEnd::Protocol(_)));
    let sent: Vec<Message> = sent.collect().await;
    let reason = sent.first().and_then(close_reason).expect("close frame");
    assert_eq!(reason.code, CloseCode::Protocol);
}

#[rstest]
#[tokio::test]
async fn publishes_compose_requests_then_closes_on_shutdown() {
    let (dispatcher, publisher, shutdown) = live_channel(Arc::new(RecordingSink::default()));
    let (socket, mut sent) = socket();
    let (_frame_tx, frames) = frame_channel::unbounded::<Result<Frame, WsProtocolError>>();
    let task = tokio::spawn(dispatcher.run(frames, socket));

    let request = ComposeRequest::new_post(AuthorId::from("a1"), "hello", AuthorKind::User)
        .expect("valid post");
    publisher.publish(request).await.expect("channel open");

    let Some(Message::Text(body)) = sent.next().await else {
        panic!("expected text frame");
    };
    let value: serde_json::Value = serde_json::from_str(&body).expect("json payload");
    assert_eq!(value.get("type"), Some(&json!("newPost")));

    shutdown.shutdown();
    let end = task.await.expect("dispatcher joins");
    assert!(matches!(end, LiveSessionEnd::Shutdown));

    let close = sent.next().await.expect("close frame");
    assert_eq!(close_reason(&close).map(|r| r.code), Some(CloseCode::Normal));
}

#[rstest]
#[tokio::test]
async fn publishing_after_the_dispatcher_stops_fails() {
    let (dispatcher, publisher, _shutdown) = live_channel(Arc::new(RecordingSink::default()));
    let (socket, _sent) = socket();
    dispatcher.run(stream::iter(Vec::new()), socket).await;

    let request = ComposeRequest::new_post(AuthorId::from("a1"), "hello", AuthorKind::Agent)
        .expect("valid post");
    let error = publisher.publish(request).await.expect_err("dispatcher gone");
    assert_eq!(error, ComposePublishError::Disconnected);
}
