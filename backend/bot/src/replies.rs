//! User-facing reply texts.
//!
//! Failure replies stay generic and actionable; internal error detail is
//! logged, never interpolated into chat messages.

use claimsnap_core::RegisteredUser;

pub fn contact_request_welcome(first_name: &str) -> String {
    format!(
        "👋 Welcome to ClaimSnap, {first_name}!\n\n\
         To use this bot, we need to verify your phone number.\n\n\
         📱 Please tap the button below to share your phone number."
    )
}

pub const CONTACT_REQUEST_REMINDER: &str = "Please share your phone number to register.";

pub const SHARE_OWN_CONTACT: &str = "Please share your own contact, not someone else's.\n\n\
     Tap the button below to share your phone number.";

pub const PHONE_ALREADY_LINKED: &str =
    "This phone number is already linked to another chat account.\n\n\
     Please contact your administrator if you need help.";

pub fn registration_success(user: &RegisteredUser) -> String {
    format!(
        "Registration successful!\n\n\
         Welcome, {}!\n\
         Email: {}\n\
         Phone: {}\n\n\
         You can now send receipt photos for reimbursement requests.\n\n\
         Use /start anytime for help.",
        user.name, user.email, user.phone_number
    )
}

pub fn phone_not_found(phone_number: &str) -> String {
    format!(
        "Phone number {phone_number} is not in our records.\n\n\
         Please make sure you're registered with the company.\n\
         Contact your administrator for assistance."
    )
}

pub const MULTIPLE_PHOTOS: &str = "Multiple photos detected!\n\n\
     Please send ONLY ONE receipt photo at a time.\n\n\
     Send your receipt photos one by one for processing.";

pub const INVALID_FILE_TYPE: &str = "Invalid file type.\n\n\
     Please send a PHOTO of your receipt only.\n\n\
     Documents, videos, and other file types are not supported.";

pub const UNSUPPORTED_MESSAGE: &str = "Unsupported message type.\n\n\
     Please send a photo of your receipt or use /start for help.";

pub const PROCESSING_FAILED: &str = "Receipt Processing Failed\n\n\
     We couldn't read the receipt properly. This could be because:\n\
     • The image is too blurry or unclear\n\
     • The receipt text is not readable\n\
     • Poor lighting conditions\n\n\
     Please try again with:\n\
     ✓ Better lighting\n\
     ✓ Clear, focused photo\n\
     ✓ Receipt laid flat\n\n\
     Send another receipt photo when ready!";

pub const UPLOAD_ERROR: &str =
    "Error uploading receipt. Please try again in a moment or contact support.";

pub fn receipt_summary(merchant_name: &str, amount: f64) -> String {
    format!(
        "Receipt uploaded successfully!\n\n\
         Receipt Details (from OCR):\n\
         Merchant: {merchant_name}\n\
         Amount: ${amount:.2}\n\n\
         Please type a description for this expense:\n\
         (e.g., \"Team lunch\", \"Office supplies\", \"Client meeting dinner\")"
    )
}

pub const CANCELLED: &str = "Receipt submission cancelled.\n\n\
     Send a new receipt photo to start over.";

pub fn submitted_summary(merchant_name: &str, amount: f64, description: &str) -> String {
    format!(
        "Reimbursement request submitted successfully!\n\n\
         Summary:\n\
         Merchant: {merchant_name}\n\
         Amount: ${amount:.2}\n\
         Description: {description}\n\n\
         Your request is now pending admin approval. You'll be notified once it's reviewed."
    )
}

pub const SUBMISSION_ERROR: &str =
    "Error submitting reimbursement. Please try again or contact support.";

pub const WELCOME_HELP: &str = "Welcome to ClaimSnap!\n\n\
     Send me a photo of your receipt to submit a reimbursement request.\n\n\
     How it works:\n\
     1. Upload a receipt photo\n\
     2. OCR extracts the merchant name and amount\n\
     3. Type a reimbursement description\n\
     4. Request submitted, wait for admin approval\n\n\
     You'll be notified once your request is reviewed.";

pub const SEND_PHOTO_GUIDANCE: &str = "Please send a photo of your receipt to submit a \
     reimbursement request.\n\nUse /start for help.";
