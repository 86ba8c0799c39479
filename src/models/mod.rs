pub mod artist;
pub mod booking;
pub mod content;
pub mod customer;
pub mod gallery;
pub mod service;
pub mod testimonial;

pub use artist::{Artist, ArtistPatch, NewArtist};
pub use booking::{Booking, BookingPatch, BookingStatus, NewBooking};
pub use content::{ContentItem, ContentPatch, NewContentItem};
pub use customer::{Customer, CustomerPatch, NewCustomer};
pub use gallery::{GalleryItem, GalleryPatch, NewGalleryItem};
pub use service::{NewService, Service, ServicePatch};
pub use testimonial::{NewTestimonial, Testimonial, TestimonialPatch};
