//! Links into the video platform for a stored video.

use url::form_urlencoded;

use crate::ids::VideoId;

const WATCH_ENDPOINT: &str = "https://www.youtube.com/watch";
const THUMBNAIL_ENDPOINT: &str = "https://img.youtube.com/vi";

/// Watch page that resumes at `time` (whole seconds).
pub fn watch_url(id: &VideoId, time: f64) -> String {
    let offset = if time.is_finite() && time > 0.0 {
        time.floor() as u64
    } else {
        0
    };
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("v", id.as_str())
        .append_pair("t", &offset.to_string())
        .finish();
    format!("{WATCH_ENDPOINT}?{query}")
}

pub fn thumbnail_url(id: &VideoId) -> String {
    let segment: String =
        form_urlencoded::byte_serialize(id.as_str().as_bytes()).collect();
    format!("{THUMBNAIL_ENDPOINT}/{segment}/hqdefault.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_url_floors_offset() {
        let id = VideoId::new("dQw4w9WgXcQ").unwrap();
        assert_eq!(
            watch_url(&id, 42.9),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42"
        );
        assert_eq!(
            thumbnail_url(&id),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
        );
    }

    #[test]
    fn odd_ids_are_escaped() {
        let id = VideoId::new("a&b").unwrap();
        assert_eq!(
            watch_url(&id, -1.0),
            "https://www.youtube.com/watch?v=a%26b&t=0"
        );
    }
}
