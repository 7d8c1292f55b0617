//! Failure → user-facing message mapping
//!
//! Exactly one message per failure kind. Messages never include key
//! material, raw cryptographic errors, or internal detail.

use ddrop_core::ShareError;

pub fn user_message(err: &ShareError) -> String {
    match err {
        ShareError::InvalidLinkFormat(_) => "Invalid share link format.".into(),
        ShareError::NotFoundOrAlreadyConsumed => {
            "File not found. It may have already been downloaded and deleted.".into()
        }
        // A wrong key and corrupted data are deliberately indistinguishable
        ShareError::DecryptionFailed | ShareError::MalformedBlob { .. } => {
            "Decryption failed. The link may be damaged or the file corrupted.".into()
        }
        ShareError::Upload(_) => "An error occurred during upload. Please try again.".into(),
        ShareError::Network(_) => "A network error occurred. Please try again.".into(),
        ShareError::Io(_) => "Could not save the file. Please try again.".into(),
        ShareError::Other(_) => "Something went wrong. Please start over.".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decrypt_and_malformed_share_one_message() {
        let decrypt = user_message(&ShareError::DecryptionFailed);
        let malformed = user_message(&ShareError::MalformedBlob { len: 3, min: 44 });
        assert_eq!(decrypt, malformed, "no oracle between wrong key and corruption");
    }

    #[test]
    fn test_messages_do_not_leak_detail() {
        let msg = user_message(&ShareError::Upload("x-amz-id-2 gibberish".into()));
        assert!(!msg.contains("x-amz"), "transport detail must not reach the user");
    }
}
