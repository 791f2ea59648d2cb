//! Static Huffman code tables for HPACK string literals.
//!
//! This draft carries one table per direction: request headers use
//! codes of 4 to 26 bits with a 26-bit all-ones EOS, response headers
//! use codes of 5 to 30 bits with a 30-bit all-ones EOS. Codes are
//! stored right-aligned.

/// One Huffman code: right-aligned bits and bit length.
#[derive(Debug, Clone, Copy)]
pub struct HuffmanCode {
    pub code: u32,
    pub len: u8,
}

const fn huff(code: u32, len: u8) -> HuffmanCode {
    HuffmanCode { code, len }
}

/// Index of the EOS symbol in either table.
pub const EOS: usize = 256;

/// Huffman codes for request headers (257 entries: bytes 0-255 + EOS).
pub const REQUEST_CODES: [HuffmanCode; 257] = [
    huff(0x3ffff50, 26), // 0
    huff(0x3ffff51, 26), // 1
    huff(0x3ffff52, 26), // 2
    huff(0x3ffff53, 26), // 3
    huff(0x3ffff54, 26), // 4
    huff(0x3ffff55, 26), // 5
    huff(0x3ffff56, 26), // 6
    huff(0x3ffff57, 26), // 7
    huff(0x3ffff58, 26), // 8
    huff(0x3ffff59, 26), // 9
    huff(0x3ffff5a, 26), // 10
    huff(0x3ffff5b, 26), // 11
    huff(0x3ffff5c, 26), // 12
    huff(0x3ffff5d, 26), // 13
    huff(0x3ffff5e, 26), // 14
    huff(0x3ffff5f, 26), // 15
    huff(0x3ffff60, 26), // 16
    huff(0x3ffff61, 26), // 17
    huff(0x3ffff62, 26), // 18
    huff(0x3ffff63, 26), // 19
    huff(0x3ffff64, 26), // 20
    huff(0x3ffff65, 26), // 21
    huff(0x3ffff66, 26), // 22
    huff(0x3ffff67, 26), // 23
    huff(0x3ffff68, 26), // 24
    huff(0x3ffff69, 26), // 25
    huff(0x3ffff6a, 26), // 26
    huff(0x3ffff6b, 26), // 27
    huff(0x3ffff6c, 26), // 28
    huff(0x3ffff6d, 26), // 29
    huff(0x3ffff6e, 26), // 30
    huff(0x3ffff6f, 26), // 31
    huff(0xee, 8), // 32 ' '
    huff(0xef, 8), // 33 '!'
    huff(0xf0, 8), // 34 '"'
    huff(0x3ffff70, 26), // 35 '#'
    huff(0x3ffff71, 26), // 36 '$'
    huff(0x1e, 6), // 37 '%'
    huff(0xf1, 8), // 38 '&'
    huff(0xf2, 8), // 39 "'"
    huff(0xf3, 8), // 40 '('
    huff(0xf4, 8), // 41 ')'
    huff(0x64, 7), // 42 '*'
    huff(0x65, 7), // 43 '+'
    huff(0xf5, 8), // 44 ','
    huff(0x66, 7), // 45 '-'
    huff(0x1f, 6), // 46 '.'
    huff(0x8, 5), // 47 '/'
    huff(0x0, 4), // 48 '0'
    huff(0x1, 4), // 49 '1'
    huff(0x2, 4), // 50 '2'
    huff(0x3, 4), // 51 '3'
    huff(0x20, 6), // 52 '4'
    huff(0x21, 6), // 53 '5'
    huff(0x22, 6), // 54 '6'
    huff(0x23, 6), // 55 '7'
    huff(0x24, 6), // 56 '8'
    huff(0x25, 6), // 57 '9'
    huff(0x26, 6), // 58 ':'
    huff(0x27, 6), // 59 ';'
    huff(0x3ffff72, 26), // 60 '<'
    huff(0x28, 6), // 61 '='
    huff(0x3ffff73, 26), // 62 '>'
    huff(0x67, 7), // 63 '?'
    huff(0x68, 7), // 64 '@'
    huff(0x69, 7), // 65 'A'
    huff(0xf6, 8), // 66 'B'
    huff(0xf7, 8), // 67 'C'
    huff(0xf8, 8), // 68 'D'
    huff(0xf9, 8), // 69 'E'
    huff(0xfa, 8), // 70 'F'
    huff(0xfb, 8), // 71 'G'
    huff(0xfc, 8), // 72 'H'
    huff(0xfd, 8), // 73 'I'
    huff(0xfe, 8), // 74 'J'
    huff(0x1fe, 9), // 75 'K'
    huff(0x3fe, 10), // 76 'L'
    huff(0x7fe, 11), // 77 'M'
    huff(0xffe, 12), // 78 'N'
    huff(0x1ffe, 13), // 79 'O'
    huff(0x3ffe, 14), // 80 'P'
    huff(0x7ffe, 15), // 81 'Q'
    huff(0xfffe, 16), // 82 'R'
    huff(0x6a, 7), // 83 'S'
    huff(0x1fffe, 17), // 84 'T'
    huff(0x3fffe, 18), // 85 'U'
    huff(0xffffc, 20), // 86 'V'
    huff(0x7fffe8, 23), // 87 'W'
    huff(0xffffd2, 24), // 88 'X'
    huff(0xffffd3, 24), // 89 'Y'
    huff(0x3ffff74, 26), // 90 'Z'
    huff(0x3ffff75, 26), // 91 '['
    huff(0x3ffff76, 26), // 92 '\\'
    huff(0x3ffff77, 26), // 93 ']'
    huff(0x3ffff78, 26), // 94 '^'
    huff(0x6b, 7), // 95 '_'
    huff(0x3ffff79, 26), // 96 '`'
    huff(0x9, 5), // 97 'a'
    huff(0x29, 6), // 98 'b'
    huff(0xa, 5), // 99 'c'
    huff(0x2a, 6), // 100 'd'
    huff(0xb, 5), // 101 'e'
    huff(0x6c, 7), // 102 'f'
    huff(0x6d, 7), // 103 'g'
    huff(0x2b, 6), // 104 'h'
    huff(0xc, 5), // 105 'i'
    huff(0x6e, 7), // 106 'j'
    huff(0x6f, 7), // 107 'k'
    huff(0x2c, 6), // 108 'l'
    huff(0x2d, 6), // 109 'm'
    huff(0x2e, 6), // 110 'n'
    huff(0xd, 5), // 111 'o'
    huff(0x2f, 6), // 112 'p'
    huff(0x70, 7), // 113 'q'
    huff(0x71, 7), // 114 'r'
    huff(0xe, 5), // 115 's'
    huff(0x30, 6), // 116 't'
    huff(0x31, 6), // 117 'u'
    huff(0x72, 7), // 118 'v'
    huff(0x73, 7), // 119 'w'
    huff(0x74, 7), // 120 'x'
    huff(0x75, 7), // 121 'y'
    huff(0x76, 7), // 122 'z'
    huff(0x3ffff7a, 26), // 123 '{'
    huff(0x3ffff7b, 26), // 124 '|'
    huff(0x3ffff7c, 26), // 125 '}'
    huff(0x3ffff7d, 26), // 126 '~'
    huff(0x3ffff7e, 26), // 127
    huff(0x3ffff7f, 26), // 128
    huff(0x3ffff80, 26), // 129
    huff(0x3ffff81, 26), // 130
    huff(0x3ffff82, 26), // 131
    huff(0x3ffff83, 26), // 132
    huff(0x3ffff84, 26), // 133
    huff(0x3ffff85, 26), // 134
    huff(0x3ffff86, 26), // 135
    huff(0x3ffff87, 26), // 136
    huff(0x3ffff88, 26), // 137
    huff(0x3ffff89, 26), // 138
    huff(0x3ffff8a, 26), // 139
    huff(0x3ffff8b, 26), // 140
    huff(0x3ffff8c, 26), // 141
    huff(0x3ffff8d, 26), // 142
    huff(0x3ffff8e, 26), // 143
    huff(0x3ffff8f, 26), // 144
    huff(0x3ffff90, 26), // 145
    huff(0x3ffff91, 26), // 146
    huff(0x3ffff92, 26), // 147
    huff(0x3ffff93, 26), // 148
    huff(0x3ffff94, 26), // 149
    huff(0x3ffff95, 26), // 150
    huff(0x3ffff96, 26), // 151
    huff(0x3ffff97, 26), // 152
    huff(0x3ffff98, 26), // 153
    huff(0x3ffff99, 26), // 154
    huff(0x3ffff9a, 26), // 155
    huff(0x3ffff9b, 26), // 156
    huff(0x3ffff9c, 26), // 157
    huff(0x3ffff9d, 26), // 158
    huff(0x3ffff9e, 26), // 159
    huff(0x3ffff9f, 26), // 160
    huff(0x3ffffa0, 26), // 161
    huff(0x3ffffa1, 26), // 162
    huff(0x3ffffa2, 26), // 163
    huff(0x3ffffa3, 26), // 164
    huff(0x3ffffa4, 26), // 165
    huff(0x3ffffa5, 26), // 166
    huff(0x3ffffa6, 26), // 167
    huff(0x3ffffa7, 26), // 168
    huff(0x3ffffa8, 26), // 169
    huff(0x3ffffa9, 26), // 170
    huff(0x3ffffaa, 26), // 171
    huff(0x3ffffab, 26), // 172
    huff(0x3ffffac, 26), // 173
    huff(0x3ffffad, 26), // 174
    huff(0x3ffffae, 26), // 175
    huff(0x3ffffaf, 26), // 176
    huff(0x3ffffb0, 26), // 177
    huff(0x3ffffb1, 26), // 178
    huff(0x3ffffb2, 26), // 179
    huff(0x3ffffb3, 26), // 180
    huff(0x3ffffb4, 26), // 181
    huff(0x3ffffb5, 26), // 182
    huff(0x3ffffb6, 26), // 183
    huff(0x3ffffb7, 26), // 184
    huff(0x3ffffb8, 26), // 185
    huff(0x3ffffb9, 26), // 186
    huff(0x3ffffba, 26), // 187
    huff(0x3ffffbb, 26), // 188
    huff(0x3ffffbc, 26), // 189
    huff(0x3ffffbd, 26), // 190
    huff(0x3ffffbe, 26), // 191
    huff(0x3ffffbf, 26), // 192
    huff(0x3ffffc0, 26), // 193
    huff(0x3ffffc1, 26), // 194
    huff(0x3ffffc2, 26), // 195
    huff(0x3ffffc3, 26), // 196
    huff(0x3ffffc4, 26), // 197
    huff(0x3ffffc5, 26), // 198
    huff(0x3ffffc6, 26), // 199
    huff(0x3ffffc7, 26), // 200
    huff(0x3ffffc8, 26), // 201
    huff(0x3ffffc9, 26), // 202
    huff(0x3ffffca, 26), // 203
    huff(0x3ffffcb, 26), // 204
    huff(0x3ffffcc, 26), // 205
    huff(0x3ffffcd, 26), // 206
    huff(0x3ffffce, 26), // 207
    huff(0x3ffffcf, 26), // 208
    huff(0x3ffffd0, 26), // 209
    huff(0x3ffffd1, 26), // 210
    huff(0x3ffffd2, 26), // 211
    huff(0x3ffffd3, 26), // 212
    huff(0x3ffffd4, 26), // 213
    huff(0x3ffffd5, 26), // 214
    huff(0x3ffffd6, 26), // 215
    huff(0x3ffffd7, 26), // 216
    huff(0x3ffffd8, 26), // 217
    huff(0x3ffffd9, 26), // 218
    huff(0x3ffffda, 26), // 219
    huff(0x3ffffdb, 26), // 220
    huff(0x3ffffdc, 26), // 221
    huff(0x3ffffdd, 26), // 222
    huff(0x3ffffde, 26), // 223
    huff(0x3ffffdf, 26), // 224
    huff(0x3ffffe0, 26), // 225
    huff(0x3ffffe1, 26), // 226
    huff(0x3ffffe2, 26), // 227
    huff(0x3ffffe3, 26), // 228
    huff(0x3ffffe4, 26), // 229
    huff(0x3ffffe5, 26), // 230
    huff(0x3ffffe6, 26), // 231
    huff(0x3ffffe7, 26), // 232
    huff(0x3ffffe8, 26), // 233
    huff(0x3ffffe9, 26), // 234
    huff(0x3ffffea, 26), // 235
    huff(0x3ffffeb, 26), // 236
    huff(0x3ffffec, 26), // 237
    huff(0x3ffffed, 26), // 238
    huff(0x3ffffee, 26), // 239
    huff(0x3ffffef, 26), // 240
    huff(0x3fffff0, 26), // 241
    huff(0x3fffff1, 26), // 242
    huff(0x3fffff2, 26), // 243
    huff(0x3fffff3, 26), // 244
    huff(0x3fffff4, 26), // 245
    huff(0x3fffff5, 26), // 246
    huff(0x3fffff6, 26), // 247
    huff(0x3fffff7, 26), // 248
    huff(0x3fffff8, 26), // 249
    huff(0x3fffff9, 26), // 250
    huff(0x3fffffa, 26), // 251
    huff(0x3fffffb, 26), // 252
    huff(0x3fffffc, 26), // 253
    huff(0x3fffffd, 26), // 254
    huff(0x3fffffe, 26), // 255
    huff(0x3ffffff, 26), // 256 EOS
];

/// Huffman codes for response headers (257 entries: bytes 0-255 + EOS).
pub const RESPONSE_CODES: [HuffmanCode; 257] = [
    huff(0x1ff8, 13), // 0
    huff(0x7fffd8, 23), // 1
    huff(0xfffffe2, 28), // 2
    huff(0xfffffe3, 28), // 3
    huff(0xfffffe4, 28), // 4
    huff(0xfffffe5, 28), // 5
    huff(0xfffffe6, 28), // 6
    huff(0xfffffe7, 28), // 7
    huff(0xfffffe8, 28), // 8
    huff(0xffffea, 24), // 9
    huff(0x3ffffffc, 30), // 10
    huff(0xfffffe9, 28), // 11
    huff(0xfffffea, 28), // 12
    huff(0x3ffffffd, 30), // 13
    huff(0xfffffeb, 28), // 14
    huff(0xfffffec, 28), // 15
    huff(0xfffffed, 28), // 16
    huff(0xfffffee, 28), // 17
    huff(0xfffffef, 28), // 18
    huff(0xffffff0, 28), // 19
    huff(0xffffff1, 28), // 20
    huff(0xffffff2, 28), // 21
    huff(0x3ffffffe, 30), // 22
    huff(0xffffff3, 28), // 23
    huff(0xffffff4, 28), // 24
    huff(0xffffff5, 28), // 25
    huff(0xffffff6, 28), // 26
    huff(0xffffff7, 28), // 27
    huff(0xffffff8, 28), // 28
    huff(0xffffff9, 28), // 29
    huff(0xffffffa, 28), // 30
    huff(0xffffffb, 28), // 31
    huff(0x14, 6), // 32 ' '
    huff(0x3f8, 10), // 33 '!'
    huff(0x3f9, 10), // 34 '"'
    huff(0xffa, 12), // 35 '#'
    huff(0x1ff9, 13), // 36 '$'
    huff(0x15, 6), // 37 '%'
    huff(0xf8, 8), // 38 '&'
    huff(0x7fa, 11), // 39 "'"
    huff(0x3fa, 10), // 40 '('
    huff(0x3fb, 10), // 41 ')'
    huff(0xf9, 8), // 42 '*'
    huff(0x7fb, 11), // 43 '+'
    huff(0xfa, 8), // 44 ','
    huff(0x16, 6), // 45 '-'
    huff(0x17, 6), // 46 '.'
    huff(0x18, 6), // 47 '/'
    huff(0x0, 5), // 48 '0'
    huff(0x1, 5), // 49 '1'
    huff(0x2, 5), // 50 '2'
    huff(0x19, 6), // 51 '3'
    huff(0x1a, 6), // 52 '4'
    huff(0x1b, 6), // 53 '5'
    huff(0x1c, 6), // 54 '6'
    huff(0x1d, 6), // 55 '7'
    huff(0x1e, 6), // 56 '8'
    huff(0x1f, 6), // 57 '9'
    huff(0x5c, 7), // 58 ':'
    huff(0xfb, 8), // 59 ';'
    huff(0x7ffc, 15), // 60 '<'
    huff(0x20, 6), // 61 '='
    huff(0xffb, 12), // 62 '>'
    huff(0x3fc, 10), // 63 '?'
    huff(0x1ffa, 13), // 64 '@'
    huff(0x21, 6), // 65 'A'
    huff(0x5d, 7), // 66 'B'
    huff(0x5e, 7), // 67 'C'
    huff(0x5f, 7), // 68 'D'
    huff(0x60, 7), // 69 'E'
    huff(0x61, 7), // 70 'F'
    huff(0x62, 7), // 71 'G'
    huff(0x63, 7), // 72 'H'
    huff(0x64, 7), // 73 'I'
    huff(0x65, 7), // 74 'J'
    huff(0x66, 7), // 75 'K'
    huff(0x67, 7), // 76 'L'
    huff(0x68, 7), // 77 'M'
    huff(0x69, 7), // 78 'N'
    huff(0x6a, 7), // 79 'O'
    huff(0x6b, 7), // 80 'P'
    huff(0x6c, 7), // 81 'Q'
    huff(0x6d, 7), // 82 'R'
    huff(0x6e, 7), // 83 'S'
    huff(0x6f, 7), // 84 'T'
    huff(0x70, 7), // 85 'U'
    huff(0x71, 7), // 86 'V'
    huff(0x72, 7), // 87 'W'
    huff(0xfc, 8), // 88 'X'
    huff(0x73, 7), // 89 'Y'
    huff(0xfd, 8), // 90 'Z'
    huff(0x1ffb, 13), // 91 '['
    huff(0x7fff0, 19), // 92 '\\'
    huff(0x1ffc, 13), // 93 ']'
    huff(0x3ffc, 14), // 94 '^'
    huff(0x22, 6), // 95 '_'
    huff(0x7ffd, 15), // 96 '`'
    huff(0x3, 5), // 97 'a'
    huff(0x23, 6), // 98 'b'
    huff(0x4, 5), // 99 'c'
    huff(0x24, 6), // 100 'd'
    huff(0x5, 5), // 101 'e'
    huff(0x25, 6), // 102 'f'
    huff(0x26, 6), // 103 'g'
    huff(0x27, 6), // 104 'h'
    huff(0x6, 5), // 105 'i'
    huff(0x74, 7), // 106 'j'
    huff(0x75, 7), // 107 'k'
    huff(0x28, 6), // 108 'l'
    huff(0x29, 6), // 109 'm'
    huff(0x2a, 6), // 110 'n'
    huff(0x7, 5), // 111 'o'
    huff(0x2b, 6), // 112 'p'
    huff(0x76, 7), // 113 'q'
    huff(0x2c, 6), // 114 'r'
    huff(0x8, 5), // 115 's'
    huff(0x9, 5), // 116 't'
    huff(0x2d, 6), // 117 'u'
    huff(0x77, 7), // 118 'v'
    huff(0x78, 7), // 119 'w'
    huff(0x79, 7), // 120 'x'
    huff(0x7a, 7), // 121 'y'
    huff(0x7b, 7), // 122 'z'
    huff(0x7ffe, 15), // 123 '{'
    huff(0x7fc, 11), // 124 '|'
    huff(0x3ffd, 14), // 125 '}'
    huff(0x1ffd, 13), // 126 '~'
    huff(0xffffffc, 28), // 127
    huff(0xfffe6, 20), // 128
    huff(0x3fffd2, 22), // 129
    huff(0xfffe7, 20), // 130
    huff(0xfffe8, 20), // 131
    huff(0x3fffd3, 22), // 132
    huff(0x3fffd4, 22), // 133
    huff(0x3fffd5, 22), // 134
    huff(0x7fffd9, 23), // 135
    huff(0x3fffd6, 22), // 136
    huff(0x7fffda, 23), // 137
    huff(0x7fffdb, 23), // 138
    huff(0x7fffdc, 23), // 139
    huff(0x7fffdd, 23), // 140
    huff(0x7fffde, 23), // 141
    huff(0xffffeb, 24), // 142
    huff(0x7fffdf, 23), // 143
    huff(0xffffec, 24), // 144
    huff(0xffffed, 24), // 145
    huff(0x3fffd7, 22), // 146
    huff(0x7fffe0, 23), // 147
    huff(0xffffee, 24), // 148
    huff(0x7fffe1, 23), // 149
    huff(0x7fffe2, 23), // 150
    huff(0x7fffe3, 23), // 151
    huff(0x7fffe4, 23), // 152
    huff(0x1fffdc, 21), // 153
    huff(0x3fffd8, 22), // 154
    huff(0x7fffe5, 23), // 155
    huff(0x3fffd9, 22), // 156
    huff(0x7fffe6, 23), // 157
    huff(0x7fffe7, 23), // 158
    huff(0xffffef, 24), // 159
    huff(0x3fffda, 22), // 160
    huff(0x1fffdd, 21), // 161
    huff(0xfffe9, 20), // 162
    huff(0x3fffdb, 22), // 163
    huff(0x3fffdc, 22), // 164
    huff(0x7fffe8, 23), // 165
    huff(0x7fffe9, 23), // 166
    huff(0x1fffde, 21), // 167
    huff(0x7fffea, 23), // 168
    huff(0x3fffdd, 22), // 169
    huff(0x3fffde, 22), // 170
    huff(0xfffff0, 24), // 171
    huff(0x1fffdf, 21), // 172
    huff(0x3fffdf, 22), // 173
    huff(0x7fffeb, 23), // 174
    huff(0x7fffec, 23), // 175
    huff(0x1fffe0, 21), // 176
    huff(0x1fffe1, 21), // 177
    huff(0x3fffe0, 22), // 178
    huff(0x1fffe2, 21), // 179
    huff(0x7fffed, 23), // 180
    huff(0x3fffe1, 22), // 181
    huff(0x7fffee, 23), // 182
    huff(0x7fffef, 23), // 183
    huff(0xfffea, 20), // 184
    huff(0x3fffe2, 22), // 185
    huff(0x3fffe3, 22), // 186
    huff(0x3fffe4, 22), // 187
    huff(0x7ffff0, 23), // 188
    huff(0x3fffe5, 22), // 189
    huff(0x3fffe6, 22), // 190
    huff(0x7ffff1, 23), // 191
    huff(0x3ffffe0, 26), // 192
    huff(0x3ffffe1, 26), // 193
    huff(0xfffeb, 20), // 194
    huff(0x7fff1, 19), // 195
    huff(0x3fffe7, 22), // 196
    huff(0x7ffff2, 23), // 197
    huff(0x3fffe8, 22), // 198
    huff(0x1ffffec, 25), // 199
    huff(0x3ffffe2, 26), // 200
    huff(0x3ffffe3, 26), // 201
    huff(0x3ffffe4, 26), // 202
    huff(0x7ffffde, 27), // 203
    huff(0x7ffffdf, 27), // 204
    huff(0x3ffffe5, 26), // 205
    huff(0xfffff1, 24), // 206
    huff(0x1ffffed, 25), // 207
    huff(0x7fff2, 19), // 208
    huff(0x1fffe3, 21), // 209
    huff(0x3ffffe6, 26), // 210
    huff(0x7ffffe0, 27), // 211
    huff(0x7ffffe1, 27), // 212
    huff(0x3ffffe7, 26), // 213
    huff(0x7ffffe2, 27), // 214
    huff(0xfffff2, 24), // 215
    huff(0x1fffe4, 21), // 216
    huff(0x1fffe5, 21), // 217
    huff(0x3ffffe8, 26), // 218
    huff(0x3ffffe9, 26), // 219
    huff(0xffffffd, 28), // 220
    huff(0x7ffffe3, 27), // 221
    huff(0x7ffffe4, 27), // 222
    huff(0x7ffffe5, 27), // 223
    huff(0xfffec, 20), // 224
    huff(0xfffff3, 24), // 225
    huff(0xfffed, 20), // 226
    huff(0x1fffe6, 21), // 227
    huff(0x3fffe9, 22), // 228
    huff(0x1fffe7, 21), // 229
    huff(0x1fffe8, 21), // 230
    huff(0x7ffff3, 23), // 231
    huff(0x3fffea, 22), // 232
    huff(0x3fffeb, 22), // 233
    huff(0x1ffffee, 25), // 234
    huff(0x1ffffef, 25), // 235
    huff(0xfffff4, 24), // 236
    huff(0xfffff5, 24), // 237
    huff(0x3ffffea, 26), // 238
    huff(0x7ffff4, 23), // 239
    huff(0x3ffffeb, 26), // 240
    huff(0x7ffffe6, 27), // 241
    huff(0x3ffffec, 26), // 242
    huff(0x3ffffed, 26), // 243
    huff(0x7ffffe7, 27), // 244
    huff(0x7ffffe8, 27), // 245
    huff(0x7ffffe9, 27), // 246
    huff(0x7ffffea, 27), // 247
    huff(0x7ffffeb, 27), // 248
    huff(0xffffffe, 28), // 249
    huff(0x7ffffec, 27), // 250
    huff(0x7ffffed, 27), // 251
    huff(0x7ffffee, 27), // 252
    huff(0x7ffffef, 27), // 253
    huff(0x7fffff0, 27), // 254
    huff(0x3ffffee, 26), // 255
    huff(0x3fffffff, 30), // 256 EOS
];

#[cfg(test)]
mod tests {
    use super::*;

    fn check_prefix_free(codes: &[HuffmanCode; 257]) {
        // Left-align every code to 32 bits; a prefix relationship shows
        // up as one aligned code being a truncation of another.
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i == j {
                    continue;
                }
                let (short, long) = if a.len <= b.len { (a, b) } else { (b, a) };
                assert_ne!(
                    long.code >> (long.len - short.len),
                    short.code,
                    "codes {i} and {j} overlap"
                );
            }
        }
    }

    #[test]
    fn test_request_table_shape() {
        for (i, c) in REQUEST_CODES.iter().enumerate() {
            assert!((4..=26).contains(&c.len), "entry {i} length {}", c.len);
        }
        assert_eq!(REQUEST_CODES[EOS].len, 26);
        assert_eq!(REQUEST_CODES[EOS].code, (1 << 26) - 1);
    }

    #[test]
    fn test_response_table_shape() {
        for (i, c) in RESPONSE_CODES.iter().enumerate() {
            assert!((5..=30).contains(&c.len), "entry {i} length {}", c.len);
        }
        assert_eq!(RESPONSE_CODES[EOS].len, 30);
        assert_eq!(RESPONSE_CODES[EOS].code, (1 << 30) - 1);
    }

    #[test]
    fn test_tables_are_prefix_free() {
        check_prefix_free(&REQUEST_CODES);
        check_prefix_free(&RESPONSE_CODES);
    }
}
