use std::pin::Pin;
use std::task::{Context, Poll, ready};

use bytes::Bytes;
use futures_util::future::BoxFuture;
use pin_project_lite::pin_project;
use qanouni_model::ResponseBody;
use reqwest::Response;

use crate::Error;

type NextChunk = (Response, reqwest::Result<Option<Bytes>>);

pin_project! {
    /// The body of an HTTP response, read chunk by chunk as the
    /// connection delivers it.
    pub struct HttpBody {
        next_chunk_fut: Option<BoxFuture<'static, NextChunk>>,
    }
}

impl HttpBody {
    #[inline]
    pub(crate) fn from_response(response: Response) -> Self {
        Self {
            next_chunk_fut: Some(next_chunk(response)),
        }
    }
}

impl ResponseBody for HttpBody {
    type Error = Error;

    fn poll_next_slice(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<Bytes>, Self::Error>> {
        let this = self.project();
        let Some(next_chunk_fut) = this.next_chunk_fut else {
            return Poll::Ready(Ok(None));
        };
        let (response, chunk) = ready!(next_chunk_fut.as_mut().poll(cx));
        match chunk {
            Ok(Some(bytes)) => {
                trace!("got a chunk of {} bytes", bytes.len());
                // The connection may still have more data, keep the
                // response around for the next read.
                *this.next_chunk_fut = Some(next_chunk(response));
                Poll::Ready(Ok(Some(bytes)))
            }
            Ok(None) => {
                trace!("connection closed the body");
                *this.next_chunk_fut = None;
                Poll::Ready(Ok(None))
            }
            Err(err) => {
                *this.next_chunk_fut = None;
                Poll::Ready(Err(Error::from_reqwest(err)))
            }
        }
    }
}

fn next_chunk(mut response: Response) -> BoxFuture<'static, NextChunk> {
    Box::pin(async move {
        let chunk = response.chunk().await;
        (response, chunk)
    })
}
