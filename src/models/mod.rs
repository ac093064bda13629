pub mod apartment;
pub mod identification;
pub mod material;
pub mod notice;
pub mod rental;
pub mod user;
pub mod visitor;

pub use apartment::{Apartment, ApartmentStatus, CreateApartmentRequest, UpdateApartmentRequest};
pub use identification::{Identification, IdentificationStatus, ReviewRequest};
pub use material::{MaterialRequest, MaterialStatus};
pub use notice::{AdminNotice, CreateNoticeRequest, NOTICE_POSTED_BY};
pub use rental::{Rental, RentalReportResponse};
pub use user::{
    AuthResponse, LoginRequest, RefreshToken, RefreshTokenRequest, TokenResponse, User,
    UserPublic, UserRole,
};
pub use visitor::{VisitorRequest, VisitorResponse};
