//! Request builders and fixtures shared by the server tests.

use axum::{body::Body, http::Request, response::Response};
use bytes::Bytes;
use std::io::Cursor;
use tiff::{
	encoder::{TiffEncoder, colortype},
	tags::Tag,
};

/// Hand-rolled `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartBody {
	parts: Vec<(String, Option<String>, Vec<u8>)>,
}

impl MultipartBody {
	pub const BOUNDARY: &str = "gridprobe-test-boundary";

	pub fn new() -> Self {
		Self::default()
	}

	pub fn text(self, name: &str, value: &str) -> Self {
		self.raw_text(name, value.as_bytes())
	}

	/// Text field with arbitrary, possibly non-UTF-8, content.
	pub fn raw_text(mut self, name: &str, value: &[u8]) -> Self {
		self.parts.push((name.to_string(), None, value.to_vec()));
		self
	}

	pub fn file(mut self, name: &str, file_name: &str, bytes: &[u8]) -> Self {
		self.parts.push((name.to_string(), Some(file_name.to_string()), bytes.to_vec()));
		self
	}

	pub fn content_type(&self) -> String {
		format!("multipart/form-data; boundary={}", Self::BOUNDARY)
	}

	pub fn to_bytes(&self) -> Vec<u8> {
		let mut out = Vec::new();
		for (name, file_name, bytes) in &self.parts {
			out.extend_from_slice(format!("--{}\r\n", Self::BOUNDARY).as_bytes());
			match file_name {
				Some(file_name) => out.extend_from_slice(
					format!(
						"Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
					)
					.as_bytes(),
				),
				None => out.extend_from_slice(format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes()),
			}
			out.extend_from_slice(bytes);
			out.extend_from_slice(b"\r\n");
		}
		out.extend_from_slice(format!("--{}--\r\n", Self::BOUNDARY).as_bytes());
		out
	}
}

pub fn multipart_request(uri: &str, body: &MultipartBody) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri(uri)
		.header("content-type", body.content_type())
		.body(Body::from(body.to_bytes()))
		.unwrap()
}

pub async fn body_bytes(response: Response) -> Bytes {
	axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap()
}

/// RGB8 GeoTIFF in EPSG:4326 with 0.5 degree pixels, upper left corner at (-10, 20).
pub fn geotiff_rgb_4326(width: u32, height: u32) -> Vec<u8> {
	let data = vec![90u8; (width * height * 3) as usize];
	let mut cursor = Cursor::new(Vec::new());
	{
		let mut encoder = TiffEncoder::new(&mut cursor).unwrap();
		let mut image = encoder.new_image::<colortype::RGB8>(width, height).unwrap();
		let dir = image.encoder();
		dir.write_tag(Tag::ModelPixelScaleTag, &[0.5f64, 0.5, 0.0][..]).unwrap();
		dir.write_tag(Tag::ModelTiepointTag, &[0.0f64, 0.0, 0.0, -10.0, 20.0, 0.0][..])
			.unwrap();
		dir.write_tag(
			Tag::GeoKeyDirectoryTag,
			&[1u16, 1, 0, 3, 1024, 0, 1, 2, 1025, 0, 1, 1, 2048, 0, 1, 4326][..],
		)
		.unwrap();
		image.write_data(&data).unwrap();
	}
	cursor.into_inner()
}
