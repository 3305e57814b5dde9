mod aes_ecb;
