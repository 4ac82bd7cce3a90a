use serde::Deserialize;

use crate::automation::GestureRequest;

#[derive(Debug, Deserialize)]
pub struct ClickRequest {
    pub x: u32,
    pub y: u32,
}

impl From<ClickRequest> for GestureRequest {
    fn from(request: ClickRequest) -> Self {
        GestureRequest::click(request.x, request.y)
    }
}

#[derive(Debug, Deserialize)]
pub struct ScrollRequest {
    pub start_x: u32,
    pub start_y: u32,
    pub end_x: u32,
    pub end_y: u32,
}

impl From<ScrollRequest> for GestureRequest {
    fn from(request: ScrollRequest) -> Self {
        GestureRequest::scroll(request.start_x, request.start_y, request.end_x, request.end_y)
    }
}

#[derive(Debug, Deserialize)]
pub struct InjectTextRequest {
    pub text: String,
}
