use std::future::poll_fn;
use std::pin::{Pin, pin};
use std::sync::Arc;

use bytes::Bytes;
use qanouni_model::{
    QuestionRequest, ResponseBody, Transport, TransportResponse,
};
use tracing::Instrument;

use crate::decoder::Utf8Decoder;
use crate::error::StreamError;

type ConsumeResult = Result<(), StreamError>;
type BoxedConsumeFuture = Pin<Box<dyn Future<Output = ConsumeResult> + Send>>;
type ChunkFn = Box<dyn FnMut(String) + Send + 'static>;
type HandlerFn =
    Arc<dyn Fn(QuestionRequest, ChunkFn) -> BoxedConsumeFuture + Send + Sync>;

/// A wrapper around a transport that turns a question into a stream of
/// text chunks.
///
/// The transport type is erased, so that the session doesn't need a
/// generic parameter for it.
#[derive(Clone)]
pub struct AnswerClient {
    handler_fn: HandlerFn,
}

impl AnswerClient {
    /// Creates a client that sends questions through `transport`.
    #[inline]
    pub fn new<T: Transport + 'static>(transport: T) -> Self {
        let handler_fn: HandlerFn =
            Arc::new(move |req: QuestionRequest, on_chunk: ChunkFn| {
                let fut = transport.send_question(&req);
                let consume_fut: BoxedConsumeFuture = Box::pin(
                    async move {
                        trace!("sent a question: {:?}", req.question);
                        let resp_or_err = fut.await;
                        consume_response::<T>(resp_or_err, on_chunk).await
                    }
                    .instrument(trace_span!("answer stream")),
                );
                consume_fut
            });
        Self { handler_fn }
    }

    /// Asks `question` and feeds the answer to `on_chunk` as it arrives.
    ///
    /// Every body slice that decodes to some text results in exactly one
    /// `on_chunk` call, in the order the slices were received. Chunks
    /// that were delivered before a failure are not taken back.
    ///
    /// A non-success status fails with [`StreamError::Rejected`] and
    /// never calls `on_chunk`.
    pub async fn consume(
        &self,
        question: String,
        on_chunk: impl FnMut(String) + Send + 'static,
    ) -> Result<(), StreamError> {
        (self.handler_fn)(QuestionRequest::new(question), Box::new(on_chunk))
            .await
    }
}

async fn consume_response<T: Transport>(
    resp_or_err: Result<TransportResponse<T::Body>, T::Error>,
    mut on_chunk: ChunkFn,
) -> ConsumeResult {
    let resp = match resp_or_err {
        Ok(resp) => resp,
        Err(err) => {
            error!("cannot open the answer stream: {err}");
            return Err(StreamError::Transport(Box::new(err)));
        }
    };

    let is_success = resp.is_success();
    let status = resp.status;
    let mut body = pin!(resp.body);
    let mut decoder = Utf8Decoder::new();

    if !is_success {
        let mut text = String::new();
        while let Some(bytes) = next_slice(&mut body).await? {
            text.push_str(&decoder.decode(&bytes));
        }
        text.extend(decoder.finish());
        warn!("question rejected with status {status}");
        return Err(StreamError::Rejected { status, body: text });
    }

    debug!("answer stream opened");
    let mut chunk_count = 0usize;
    while let Some(bytes) = next_slice(&mut body).await? {
        let text = decoder.decode(&bytes);
        if text.is_empty() {
            continue;
        }
        chunk_count += 1;
        on_chunk(text);
    }
    if let Some(tail) = decoder.finish() {
        warn!("answer ended in the middle of a character");
        on_chunk(tail);
    }
    debug!("answer stream closed after {chunk_count} chunk(s)");

    Ok(())
}

async fn next_slice<B: ResponseBody>(
    body: &mut Pin<&mut B>,
) -> Result<Option<Bytes>, StreamError> {
    poll_fn(|cx| body.as_mut().poll_next_slice(cx))
        .await
        .map_err(|err| {
            error!("answer stream broke: {err}");
            StreamError::Transport(Box::new(err))
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use qanouni_model::ErrorKind;
    use qanouni_test_transport::{PresetResponse, ScriptedTransport};

    use super::*;

    async fn ask(
        transport: &ScriptedTransport,
        question: &str,
    ) -> (Vec<String>, ConsumeResult) {
        let client = AnswerClient::new(transport.clone());
        let chunks = Arc::new(Mutex::new(Vec::new()));
        let result = client
            .consume(question.to_owned(), {
                let chunks = Arc::clone(&chunks);
                move |chunk| chunks.lock().unwrap().push(chunk)
            })
            .await;
        let chunks = chunks.lock().unwrap().clone();
        (chunks, result)
    }

    #[tokio::test]
    async fn test_chunks_in_order() {
        let transport = ScriptedTransport::default();
        transport.add_response(PresetResponse::with_slices(["الإ", "جابة"]));

        let (chunks, result) = ask(&transport, "ما هي حقوقي").await;
        result.unwrap();
        assert_eq!(chunks, ["الإ", "جابة"]);
        assert_eq!(
            transport.requests(),
            [QuestionRequest::new("ما هي حقوقي")]
        );
    }

    #[tokio::test]
    async fn test_boundary_independence() {
        let answer = "طبقًا للمادة 52 من القانون المدني";
        let transport = ScriptedTransport::default();
        for step in [1, 2, 3, 7] {
            transport.add_response(PresetResponse::with_slices(
                answer.as_bytes().chunks(step),
            ));
        }

        for step in [1, 2, 3, 7] {
            let (chunks, result) = ask(&transport, "ما هي حقوقي").await;
            result.unwrap();
            assert_eq!(chunks.concat(), answer, "slices of {step} byte(s)");
            assert!(chunks.iter().all(|c| !c.is_empty()));
            assert!(chunks.len() <= answer.len().div_ceil(step));
        }
    }

    #[tokio::test]
    async fn test_empty_slices_skipped() {
        let transport = ScriptedTransport::default();
        transport.add_response(PresetResponse::with_slices(["", "a", "", "b"]));

        let (chunks, result) = ask(&transport, "ما هي حقوقي").await;
        result.unwrap();
        assert_eq!(chunks, ["a", "b"]);
    }

    #[tokio::test]
    async fn test_rejected() {
        let transport = ScriptedTransport::default();
        transport
            .add_response(PresetResponse::with_status(500, "internal error"));

        let (chunks, result) = ask(&transport, "ما هي حقوقي").await;
        assert!(chunks.is_empty());
        let err = result.unwrap_err();
        assert!(matches!(
            &err,
            StreamError::Rejected { status: 500, body } if body == "internal error"
        ));
        assert_eq!(err.to_string(), "Status 500: internal error");
        assert_eq!(err.transport_kind(), None);
    }

    #[tokio::test]
    async fn test_interrupted_keeps_chunks() {
        let transport = ScriptedTransport::default();
        transport.add_response(
            PresetResponse::with_slices(["طبقًا ", "للمادة"]).interrupted(),
        );

        let (chunks, result) = ask(&transport, "ما هي حقوقي").await;
        assert_eq!(chunks, ["طبقًا ", "للمادة"]);
        let err = result.unwrap_err();
        assert_eq!(err.transport_kind(), Some(ErrorKind::Interrupted));
    }

    #[tokio::test]
    async fn test_unreachable() {
        let transport = ScriptedTransport::default();
        transport.add_response(PresetResponse::unreachable());

        let (chunks, result) = ask(&transport, "ما هي حقوقي").await;
        assert!(chunks.is_empty());
        let err = result.unwrap_err();
        assert_eq!(err.transport_kind(), Some(ErrorKind::Connect));
    }

    #[tokio::test]
    async fn test_truncated_character() {
        let bytes = "حق".as_bytes();
        let transport = ScriptedTransport::default();
        transport.add_response(PresetResponse::with_slices([&bytes[..3]]));

        let (chunks, result) = ask(&transport, "ما هي حقوقي").await;
        result.unwrap();
        assert_eq!(chunks, ["ح", "\u{fffd}"]);
    }
}
